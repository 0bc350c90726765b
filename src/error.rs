use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'b> {
    success: bool,
    error: &'b str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'b [FieldError]>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::FORBIDDEN,
            Error::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Error::Persistence(_) | Error::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, details): (String, Option<&[FieldError]>) = match self {
            Error::Validation(fields) => ("validation failed".to_owned(), Some(fields)),
            // storage-layer details never reach the client
            Error::Persistence(e) => {
                log::error!("persistence error: {}", e);
                ("internal error".to_owned(), None)
            }
            Error::Csv(e) => {
                log::error!("csv serialization error: {}", e);
                ("internal error".to_owned(), None)
            }
            other => (other.to_string(), None),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: &error,
            details,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Validation(vec![FieldError::new("email", "invalid")]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NotFound("member 1".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Unauthorized("admin only".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::ExternalService("s3".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(Error::Persistence(sqlx::Error::RowNotFound).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::BadRequest("no file".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_detail_is_not_leaked() {
        let resp = Error::Persistence(sqlx::Error::PoolTimedOut).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
