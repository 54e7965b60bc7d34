use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web, HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;

use crate::db::StoreError;
use crate::models::api::ApiResponse;

const GENERIC_ERROR: &str = "An error occurred";

/// Errors that leave the HTTP layer. Every variant renders the failure
/// envelope `{success: false, message, error}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// `expose` controls whether `detail` reaches the client.
    #[error("Internal error: {detail}")]
    Internal { detail: String, expose: bool },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn internal(detail: impl Into<String>, expose: bool) -> Self {
        ApiError::Internal {
            detail: detail.into(),
            expose,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(msg) => ApiResponse::failure("Validation error", msg.clone()),
            ApiError::NotFound(msg) => ApiResponse::failure("Not found", msg.clone()),
            ApiError::Conflict(msg) => ApiResponse::failure("Conflict", msg.clone()),
            ApiError::Internal { detail, expose } => {
                log::error!("Internal error: {}", detail);
                let error = if *expose {
                    detail.clone()
                } else {
                    GENERIC_ERROR.to_string()
                };
                ApiResponse::failure("Internal server error", error)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Errors raised by the service layer. They carry no HTTP knowledge; routes
/// convert them with `into_api`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn into_api(self, debug: bool) -> ApiError {
        match self {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::Store(err) => ApiError::internal(err.to_string(), debug),
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

/// Malformed bodies, query strings and path segments answer 422 with the
/// same envelope as explicit validation failures.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
