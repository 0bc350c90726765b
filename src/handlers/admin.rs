use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::dashboard::{export_csv, filter_members, StatusFilter};
use crate::database::members::MemberRepository;
use crate::error::Error;
use crate::models::member::{Member, MemberFile, MemberStatus};
use crate::response::StatusResponse;

pub async fn list(user: UserInfo, repo: Data<MemberRepository>) -> Result<Json<Vec<Member>>, Error> {
    user.require_admin()?;
    Ok(Json(repo.list().await?))
}

#[derive(Debug, Serialize)]
pub struct MemberDetail {
    pub member: Member,
    pub files: Vec<MemberFile>,
}

pub async fn detail(user: UserInfo, member_id: Path<(i32,)>, repo: Data<MemberRepository>) -> Result<Json<MemberDetail>, Error> {
    user.require_admin()?;
    let member_id = member_id.into_inner().0;
    let member = repo.get(member_id).await?;
    let files = repo.files(member_id).await?;
    Ok(Json(MemberDetail { member, files }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: MemberStatus,
}

pub async fn update_status(
    user: UserInfo,
    member_id: Path<(i32,)>,
    Json(StatusUpdate { status }): Json<StatusUpdate>,
    repo: Data<MemberRepository>,
) -> Result<Json<StatusResponse>, Error> {
    user.require_admin()?;
    repo.update_status(member_id.into_inner().0, status).await?;
    Ok(Json(StatusResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub search: String,
    #[serde(default = "StatusFilter::all")]
    pub status: StatusFilter,
}

pub async fn export(
    user: UserInfo,
    Query(ExportParams { search, status }): Query<ExportParams>,
    repo: Data<MemberRepository>,
) -> Result<HttpResponse, Error> {
    user.require_admin()?;
    let members = repo.list().await?;
    let filtered = filter_members(&members, &search, status);
    let body = export_csv(&filtered)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"members.csv\""))
        .body(body))
}
