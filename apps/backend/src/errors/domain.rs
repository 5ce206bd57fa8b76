//! Domain-level error type used across services and repos.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    /// The store refused a lock because another transaction holds it
    LockContention,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Person,
    StatRecord,
    Other(String),
}

/// Constraint violations surfacing from the store
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// persons.guid already present
    UniqueGuid,
    /// databases.name already present
    UniqueSourceName,
    /// (stats.person_id, stats.database_id) already has a record
    UniquePersonSource,
    /// referenced person or data source does not exist
    ForeignKey,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or out-of-range input
    Validation(String),
    /// Uniqueness / foreign-key violation
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True for uniqueness violations, which a retried transaction can resolve.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DomainError::Conflict(
                ConflictKind::UniqueGuid
                    | ConflictKind::UniqueSourceName
                    | ConflictKind::UniquePersonSource,
                _
            )
        )
    }

    /// True when rerunning the whole transaction can succeed: a uniqueness
    /// race or a lock held by a concurrent writer.
    pub fn is_retryable(&self) -> bool {
        self.is_unique_violation()
            || matches!(self, DomainError::Infra(InfraErrorKind::LockContention, _))
    }
}
