use actix_web::error::ResponseError;
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Body used for every single-message failure.
#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Body used for field-validation failures.
#[derive(Serialize)]
pub struct ErrorsBody<'a> {
    pub errors: &'a [String],
}

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Unsupported media type: {detail}")]
    UnsupportedMediaType { detail: String },
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },
    #[error("Forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client. Server-side failures are never echoed.
    fn public_message(&self) -> &str {
        match self {
            AppError::Validation { .. } => "Validation failed",
            AppError::BadRequest { detail }
            | AppError::UnsupportedMediaType { detail }
            | AppError::Forbidden { detail }
            | AppError::NotFound { detail }
            | AppError::Conflict { detail } => detail,
            AppError::Unauthorized { reason } => reason,
            AppError::DbUnavailable { .. } => "Service temporarily unavailable",
            AppError::Db { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                INTERNAL_MESSAGE
            }
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            detail: detail.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden {
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable(detail: impl Into<String>) -> Self {
        Self::DbUnavailable {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(errors) => AppError::invalid(errors),
            DomainError::Conflict(_, detail) => AppError::conflict(detail),
            DomainError::NotFound(_, detail) => AppError::not_found(detail),
            DomainError::Infra(InfraErrorKind::Timeout, detail)
            | DomainError::Infra(InfraErrorKind::DbUnavailable, detail) => {
                AppError::db_unavailable(detail)
            }
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl From<crate::auth::TokenError> for AppError {
    fn from(e: crate::auth::TokenError) -> Self {
        AppError::internal(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, http.status_code = status.as_u16(), "request failed");
        }

        let mut builder = HttpResponse::build(status);
        match self {
            AppError::Unauthorized { .. } => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
            }
            AppError::DbUnavailable { .. } => {
                builder.insert_header((header::RETRY_AFTER, "1"));
            }
            _ => {}
        }

        match self {
            AppError::Validation { errors } => builder.json(ErrorsBody { errors }),
            _ => builder.json(ErrorBody {
                error: self.public_message(),
            }),
        }
    }
}
