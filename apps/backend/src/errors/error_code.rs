//! Error codes for the scistats HTTP API.
//!
//! Every error body carries both the numeric code and its stable name.
//! Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes for the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Catch-all for anything not covered below
    Unknown,
    /// Malformed or out-of-range input
    Validation,
    /// Referenced person or (person, source) record does not exist
    RecordNotFound,
}

impl ErrorCode {
    /// Numeric code that appears as `error_code` in responses.
    pub const fn as_i32(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Validation => 1,
            Self::RecordNotFound => 2,
        }
    }

    /// Stable name that appears as `error_code_text` in responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "ERR_UNKNOWN",
            Self::Validation => "ERR_VALIDATION",
            Self::RecordNotFound => "ERR_RECORD_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
