use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, FieldError};
use crate::models::member::{FileMeta, GoldMember, NewMember};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
// digits, spaces, plus, dash, parentheses
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9+\-() ]+$").unwrap());

pub const MIN_SERVICE_DESCRIPTION_CHARS: usize = 10;
pub const REQUIRED_FILE_COUNT: usize = 3;

// Raw wire payload of the public submission form. Unknown fields are
// rejected instead of being silently carried into persistence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberSubmission {
    pub english_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub chapter: String,
    pub profession: String,
    pub phone: String,
    pub email: String,
    pub years_of_membership: i32,
    pub is_gold_member: GoldMember,
    pub wedding_category: String,
    pub wedding_services: String,
    #[serde(default)]
    pub service_area: Option<String>,
    #[serde(default)]
    pub past_cases_count: Option<i32>,
    #[serde(default)]
    pub unique_advantage: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub instagram_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub bni_member_discount: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    pub files: Vec<FileMeta>,
}

impl MemberSubmission {
    // Either a fully typed record or every failing field at once; nothing
    // is persisted from an invalid submission.
    pub fn validate(self) -> Result<(NewMember, Vec<FileMeta>), Error> {
        let mut errors = Vec::new();

        check_non_empty(&mut errors, "englishName", &self.english_name);
        check_non_empty(&mut errors, "chapter", &self.chapter);
        check_non_empty(&mut errors, "profession", &self.profession);
        check_non_empty(&mut errors, "weddingCategory", &self.wedding_category);

        if !PHONE_RE.is_match(&self.phone) {
            errors.push(FieldError::new("phone", "must contain only digits, spaces, +, - and parentheses"));
        }
        if !EMAIL_RE.is_match(&self.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if !(1..=25).contains(&self.years_of_membership) {
            errors.push(FieldError::new("yearsOfMembership", "must be between 1 and 25"));
        }
        if self.wedding_services.chars().count() < MIN_SERVICE_DESCRIPTION_CHARS {
            errors.push(FieldError::new("weddingServices", "must be at least 10 characters"));
        }

        check_link(&mut errors, "facebookLink", self.facebook_link.as_deref());
        check_link(&mut errors, "instagramLink", self.instagram_link.as_deref());
        check_link(&mut errors, "websiteLink", self.website_link.as_deref());

        if self.files.len() != REQUIRED_FILE_COUNT {
            errors.push(FieldError::new("files", "exactly 3 files are required"));
        } else {
            for (i, file) in self.files.iter().enumerate() {
                if file.file_key.is_empty()
                    || file.file_url.is_empty()
                    || file.file_name.is_empty()
                    || file.mime_type.is_empty()
                    || file.file_size <= 0
                {
                    errors.push(FieldError::new(
                        &format!("files[{}]", i),
                        "file key, url, name, size and mime type are required",
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let member = NewMember {
            english_name: self.english_name,
            company_name: self.company_name,
            chapter: self.chapter,
            profession: self.profession,
            phone: self.phone,
            email: self.email,
            years_of_membership: self.years_of_membership,
            is_gold_member: self.is_gold_member,
            wedding_category: self.wedding_category,
            wedding_services: self.wedding_services,
            service_area: self.service_area,
            past_cases_count: self.past_cases_count,
            unique_advantage: self.unique_advantage,
            facebook_link: self.facebook_link,
            instagram_link: self.instagram_link,
            website_link: self.website_link,
            bni_member_discount: self.bni_member_discount,
            referrer: self.referrer,
        };
        Ok((member, self.files))
    }
}

fn check_non_empty(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

// link fields are either empty or a syntactically valid URL
fn check_link(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>) {
    if let Some(link) = value {
        if !link.is_empty() && Url::parse(link).is_err() {
            errors.push(FieldError::new(field, "must be a valid URL"));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn file(n: u32) -> FileMeta {
        FileMeta {
            file_key: format!("test-file-key-{}", n),
            file_url: format!("https://example.com/file{}.pdf", n),
            file_name: format!("green-light-month{}.pdf", n),
            file_size: 1_024_000,
            mime_type: "application/pdf".to_owned(),
        }
    }

    fn valid_submission() -> MemberSubmission {
        MemberSubmission {
            english_name: "John Doe".to_owned(),
            company_name: Some("Test Company".to_owned()),
            chapter: "Hong Kong Chapter".to_owned(),
            profession: "Wedding Photography".to_owned(),
            phone: "+852 1234 5678".to_owned(),
            email: "john@example.com".to_owned(),
            years_of_membership: 5,
            is_gold_member: GoldMember::Yes,
            wedding_category: "攝影".to_owned(),
            wedding_services: "Professional wedding photography services with 10 years of experience.".to_owned(),
            service_area: Some("Hong Kong, Kowloon".to_owned()),
            past_cases_count: Some(100),
            unique_advantage: Some("Unique artistic style".to_owned()),
            facebook_link: Some("https://facebook.com/test".to_owned()),
            instagram_link: Some("https://instagram.com/test".to_owned()),
            website_link: Some("https://example.com".to_owned()),
            bni_member_discount: Some("10% off".to_owned()),
            referrer: Some("Jane Smith".to_owned()),
            files: vec![file(1), file(2), file(3)],
        }
    }

    fn failing_fields(err: Error) -> Vec<String> {
        match err {
            Error::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        let (member, files) = valid_submission().validate().unwrap();
        assert_eq!(member.english_name, "John Doe");
        assert_eq!(member.years_of_membership, 5);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_invalid_email_and_years_are_both_listed() {
        let mut submission = valid_submission();
        submission.email = "invalid-email".to_owned();
        submission.years_of_membership = 0;
        let fields = failing_fields(submission.validate().unwrap_err());
        assert!(fields.contains(&"email".to_owned()));
        assert!(fields.contains(&"yearsOfMembership".to_owned()));
    }

    #[test]
    fn test_empty_required_fields_are_rejected() {
        let mut submission = valid_submission();
        submission.english_name = String::new();
        submission.chapter = String::new();
        submission.profession = String::new();
        let fields = failing_fields(submission.validate().unwrap_err());
        assert!(fields.contains(&"englishName".to_owned()));
        assert!(fields.contains(&"chapter".to_owned()));
        assert!(fields.contains(&"profession".to_owned()));
    }

    #[test]
    fn test_phone_grammar() {
        let mut submission = valid_submission();
        submission.phone = "(02) 1234-5678".to_owned();
        assert!(submission.validate().is_ok());

        let mut submission = valid_submission();
        submission.phone = "call me maybe".to_owned();
        let fields = failing_fields(submission.validate().unwrap_err());
        assert_eq!(fields, vec!["phone".to_owned()]);
    }

    #[test]
    fn test_links_may_be_empty_but_not_malformed() {
        let mut submission = valid_submission();
        submission.facebook_link = Some(String::new());
        submission.instagram_link = None;
        assert!(submission.validate().is_ok());

        let mut submission = valid_submission();
        submission.website_link = Some("not a url".to_owned());
        let fields = failing_fields(submission.validate().unwrap_err());
        assert_eq!(fields, vec!["websiteLink".to_owned()]);
    }

    #[test]
    fn test_short_service_description_is_rejected() {
        let mut submission = valid_submission();
        submission.wedding_services = "short".to_owned();
        let fields = failing_fields(submission.validate().unwrap_err());
        assert_eq!(fields, vec!["weddingServices".to_owned()]);
    }

    #[test]
    fn test_exactly_three_files_required() {
        let mut submission = valid_submission();
        submission.files.pop();
        let fields = failing_fields(submission.validate().unwrap_err());
        assert_eq!(fields, vec!["files".to_owned()]);

        let mut submission = valid_submission();
        submission.files.push(file(4));
        assert!(submission.validate().is_err());
    }

    #[test]
    fn test_incomplete_file_descriptor_is_rejected() {
        let mut submission = valid_submission();
        submission.files[1].file_url = String::new();
        let fields = failing_fields(submission.validate().unwrap_err());
        assert_eq!(fields, vec!["files[1]".to_owned()]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut value = json!({
            "englishName": "John Doe",
            "chapter": "Hong Kong Chapter",
            "profession": "Wedding Photography",
            "phone": "+852 1234 5678",
            "email": "john@example.com",
            "yearsOfMembership": 5,
            "isGoldMember": "yes",
            "weddingCategory": "攝影",
            "weddingServices": "Professional wedding photography services.",
            "files": []
        });
        value["role"] = json!("admin");
        assert!(serde_json::from_value::<MemberSubmission>(value).is_err());
    }
}
