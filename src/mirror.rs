use async_trait::async_trait;
use serde_json::json;

use crate::error::Error;
use crate::models::member::NewMember;

// Appends one row per accepted submission to an external spreadsheet.
// Google API semantics stay behind the endpoint; this side only posts.
#[async_trait]
pub trait SheetMirror: Send + Sync {
    async fn append(&self, member_id: i32, member: &NewMember) -> Result<(), Error>;
}

pub struct WebhookMirror {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookMirror {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SheetMirror for WebhookMirror {
    async fn append(&self, member_id: i32, member: &NewMember) -> Result<(), Error> {
        self.client
            .post(&self.endpoint)
            .json(&json!({ "memberId": member_id, "member": member }))
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("sheet webhook: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::ExternalService(format!("sheet webhook: {}", e)))?;
        Ok(())
    }
}

pub struct LogMirror;

#[async_trait]
impl SheetMirror for LogMirror {
    async fn append(&self, member_id: i32, member: &NewMember) -> Result<(), Error> {
        log::debug!("sheet mirror skipped for member {} ({})", member_id, member.email);
        Ok(())
    }
}

// Mirroring failures must never fail the primary submission.
pub async fn dispatch(mirror: &dyn SheetMirror, member_id: i32, member: &NewMember) {
    if let Err(e) = mirror.append(member_id, member).await {
        log::warn!("spreadsheet mirror failed for member {}: {}", member_id, e);
    }
}
