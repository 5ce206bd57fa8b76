use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::errors::ErrorCode;
use crate::infra::db_errors::map_db_err;
use crate::trace_ctx;

/// Error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error_code: i32,
    pub error_code_text: String,
    pub error_text: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { detail: String },
    /// Lost a race with a concurrent transaction; rerunning it may succeed
    #[error("Contention: {detail}")]
    Contention { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    /// No route or method matched the request
    #[error("{detail}")]
    Route { detail: String },
}

impl AppError {
    /// Response-level error code for this variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::Validation,
            AppError::NotFound { .. } => ErrorCode::RecordNotFound,
            AppError::Conflict { .. }
            | AppError::Contention { .. }
            | AppError::Db { .. }
            | AppError::DbUnavailable { .. }
            | AppError::Config { .. }
            | AppError::Internal { .. }
            | AppError::Route { .. } => ErrorCode::Unknown,
        }
    }

    /// Human-readable detail for this variant
    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail }
            | AppError::NotFound { detail }
            | AppError::Conflict { detail }
            | AppError::Contention { detail }
            | AppError::Db { detail }
            | AppError::DbUnavailable { detail }
            | AppError::Config { detail }
            | AppError::Internal { detail }
            | AppError::Route { detail } => detail,
        }
    }

    /// HTTP status for this error.
    ///
    /// The public contract reports every failure as 400; clients tell
    /// failures apart by `error_code`, not by status.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Validation {
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

    pub fn contention(detail: impl Into<String>) -> Self {
        Self::Contention {
            detail: detail.into(),
        }
    }

    /// True when the failed transaction should be rerun from the start.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Contention { .. })
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

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn route(detail: impl Into<String>) -> Self {
        Self::Route {
            detail: detail.into(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let code = self.code();
        ErrorBody {
            error_code: code.as_i32(),
            error_code_text: code.as_str().to_string(),
            error_text: self.detail().to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        if e.is_retryable() {
            let detail = match e {
                DomainError::Conflict(_, detail) | DomainError::Infra(_, detail) => detail,
                other => other.to_string(),
            };
            return AppError::contention(detail);
        }
        match e {
            DomainError::Validation(detail) => AppError::invalid(detail),
            DomainError::NotFound(_, detail) => AppError::not_found(detail),
            DomainError::Conflict(_, detail) => AppError::conflict(detail),
            DomainError::Infra(InfraErrorKind::DbUnavailable | InfraErrorKind::Timeout, detail) => {
                AppError::db_unavailable(detail)
            }
            DomainError::Infra(InfraErrorKind::DataCorruption, detail) => {
                AppError::internal(detail)
            }
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status())
            .insert_header(("x-trace-id", trace_ctx::trace_id()))
            .json(self.to_body())
    }
}
