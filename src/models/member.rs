use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gold_member", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoldMember {
    Yes,
    No,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i32,
    pub english_name: String,
    pub company_name: Option<String>,
    pub chapter: String,
    pub profession: String,
    pub phone: String,
    pub email: String,
    pub years_of_membership: i32,
    pub is_gold_member: GoldMember,
    pub wedding_category: String,
    pub wedding_services: String,
    pub service_area: Option<String>,
    pub past_cases_count: Option<i32>,
    pub unique_advantage: Option<String>,
    pub facebook_link: Option<String>,
    pub instagram_link: Option<String>,
    pub website_link: Option<String>,
    pub bni_member_discount: Option<String>,
    pub referrer: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Validated insert payload. Carries no id, status or timestamps: the
// repository forces status to pending and the database stamps the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub english_name: String,
    pub company_name: Option<String>,
    pub chapter: String,
    pub profession: String,
    pub phone: String,
    pub email: String,
    pub years_of_membership: i32,
    pub is_gold_member: GoldMember,
    pub wedding_category: String,
    pub wedding_services: String,
    pub service_area: Option<String>,
    pub past_cases_count: Option<i32>,
    pub unique_advantage: Option<String>,
    pub facebook_link: Option<String>,
    pub instagram_link: Option<String>,
    pub website_link: Option<String>,
    pub bni_member_discount: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberFile {
    pub id: i32,
    pub member_id: i32,
    pub file_key: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
}

// Descriptor returned by the upload endpoint and referenced back in the
// submission. The bytes themselves live in the file store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileMeta {
    pub file_key: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
}
