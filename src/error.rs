use actix_web::{error, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::StoreError;

/// Why a share link could not be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMiss {
    Missing,
    Expired,
}

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", share_miss_message(.0))]
    NotFoundOrExpired(ShareMiss),

    #[error("{0}")]
    InvalidPrecondition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn share_miss_message(miss: &ShareMiss) -> &'static str {
    match miss {
        ShareMiss::Missing => "This share link does not exist",
        ShareMiss::Expired => "This link has expired, ask the owner to renew it",
    }
}

impl ApiError {
    /// Machine readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::NotFoundOrExpired(ShareMiss::Missing) => "share_link_not_found",
            ApiError::NotFoundOrExpired(ShareMiss::Expired) => "share_link_expired",
            ApiError::InvalidPrecondition(_) => "invalid_precondition",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::NotFoundOrExpired(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidPrecondition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Storage details stay in the logs
        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Something went wrong, please try again later".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    ApiError::Validation(format!("Invalid query: {}", err)).into()
}
