use async_trait::async_trait;
use serde::Serialize;

use crate::error::Error;
use crate::models::member::NewMember;

const SERVICE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub content: String,
}

impl Notification {
    pub fn for_submission(member: &NewMember) -> Self {
        let preview: String = member.wedding_services.chars().take(SERVICE_PREVIEW_CHARS).collect();
        Self {
            title: "新會員資訊提交".to_owned(),
            content: format!(
                "會員 {} ({}) 已提交資訊，請前往後台審核。\n\n專業領域：{}\n所屬分會：{}\n婚宴服務：{}...",
                member.english_name, member.email, member.profession, member.chapter, preview,
            ),
        }
    }
}

// Delivers a message to the administrator. Implementations are narrow:
// the submission flow only ever calls notify once per created member.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), Error>;
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), Error> {
        self.client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("admin webhook: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::ExternalService(format!("admin webhook: {}", e)))?;
        Ok(())
    }
}

// Used when no webhook is configured; the message still reaches the logs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), Error> {
        log::info!("admin notification: {}: {}", notification.title, notification.content);
        Ok(())
    }
}

// Best-effort side channel: a failed notification is logged and swallowed,
// never surfaced to the submitter.
pub async fn dispatch(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(e) = notifier.notify(notification).await {
        log::warn!("admin notification failed: {}", e);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::member::GoldMember;

    fn member_with_services(services: &str) -> NewMember {
        NewMember {
            english_name: "John Doe".to_owned(),
            company_name: None,
            chapter: "Hong Kong Chapter".to_owned(),
            profession: "Wedding Photography".to_owned(),
            phone: "+852 1234 5678".to_owned(),
            email: "john@example.com".to_owned(),
            years_of_membership: 5,
            is_gold_member: GoldMember::No,
            wedding_category: "攝影".to_owned(),
            wedding_services: services.to_owned(),
            service_area: None,
            past_cases_count: None,
            unique_advantage: None,
            facebook_link: None,
            instagram_link: None,
            website_link: None,
            bni_member_discount: None,
            referrer: None,
        }
    }

    #[test]
    fn test_notification_mentions_submitter() {
        let n = Notification::for_submission(&member_with_services("Professional wedding photography."));
        assert!(n.content.contains("John Doe"));
        assert!(n.content.contains("john@example.com"));
        assert!(n.content.contains("Wedding Photography"));
        assert!(n.content.contains("Hong Kong Chapter"));
    }

    #[test]
    fn test_service_preview_truncates_on_char_boundary() {
        let services = "婚宴攝影".repeat(60);
        let n = Notification::for_submission(&member_with_services(&services));
        let preview: String = services.chars().take(SERVICE_PREVIEW_CHARS).collect();
        assert!(n.content.contains(&preview));
        assert!(!n.content.contains(&services));
    }
}
