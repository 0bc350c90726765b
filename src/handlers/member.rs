use actix_web::web::{Data, Json};
use serde::Deserialize;

use crate::categorizer::{CategoryAnalyzer, CategorySuggestion};
use crate::database::members::MemberRepository;
use crate::error::{Error, FieldError};
use crate::mirror::{self, SheetMirror};
use crate::notifier::{self, Notification, Notifier};
use crate::response::SubmitResponse;
use crate::validation::{MemberSubmission, MIN_SERVICE_DESCRIPTION_CHARS};

// Public submission endpoint. The member row and its three file rows are
// written first; notification and spreadsheet mirroring run afterwards as
// best-effort side channels.
pub async fn submit(
    Json(submission): Json<MemberSubmission>,
    repo: Data<MemberRepository>,
    notifier: Data<dyn Notifier>,
    sheet_mirror: Data<dyn SheetMirror>,
) -> Result<Json<SubmitResponse>, Error> {
    let (member, files) = submission.validate()?;
    let member_id = repo.create(&member).await?;
    for file in &files {
        repo.attach_file(member_id, file).await?;
    }

    notifier::dispatch(notifier.get_ref(), &Notification::for_submission(&member)).await;
    mirror::dispatch(sheet_mirror.get_ref(), member_id, &member).await;

    Ok(Json(SubmitResponse { success: true, member_id }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
}

pub async fn analyze_category(
    Json(AnalyzeRequest { description }): Json<AnalyzeRequest>,
    analyzer: Data<CategoryAnalyzer>,
) -> Result<Json<CategorySuggestion>, Error> {
    if description.chars().count() < MIN_SERVICE_DESCRIPTION_CHARS {
        return Err(Error::Validation(vec![FieldError::new(
            "description",
            "must be at least 10 characters",
        )]));
    }
    Ok(Json(analyzer.analyze(&description).await?))
}
