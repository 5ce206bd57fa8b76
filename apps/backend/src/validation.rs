//! Input rules shared by the HTTP surface and the import CLI.
//!
//! Every check returns `DomainError::Validation` with a message naming the
//! offending parameter, and runs before any database work.

use lazy_regex::{lazy_regex, Lazy, Regex};
use url::Url;

use crate::errors::domain::DomainError;
use crate::repos::stats::MAX_PAGE;
use crate::state::source_catalog::SourceCatalog;

/// Upper-case canonical GUID, e.g. `0F8FAD5B-D9CB-469F-A165-70867728950E`
static GUID_RE: Lazy<Regex> =
    lazy_regex!(r"^[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}$");

pub const MAX_NAME_LEN: usize = 100;

pub fn guid(value: &str) -> Result<(), DomainError> {
    if GUID_RE.is_match(value) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "guid must be an upper-case GUID (XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX)",
        ))
    }
}

/// At most `MAX_NAME_LEN` characters (not bytes)
pub fn name(value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters (got {len})"
        )));
    }
    Ok(())
}

/// Non-negative and representable as a 32-bit count.
pub fn count(field: &str, value: i64) -> Result<i32, DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!(
            "{field} must be greater than or equal to 0"
        )));
    }
    i32::try_from(value)
        .map_err(|_| DomainError::validation(format!("{field} must be at most {}", i32::MAX)))
}

/// Absolute http(s) URL with a host.
pub fn url(value: &str) -> Result<(), DomainError> {
    let parsed =
        Url::parse(value).map_err(|e| DomainError::validation(format!("url is invalid: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DomainError::validation("url scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(DomainError::validation("url must have a host"));
    }
    Ok(())
}

/// Zero-based page whose row offset still fits the store's signed 64-bit OFFSET.
pub fn page(value: i64) -> Result<u64, DomainError> {
    let page = u64::try_from(value)
        .map_err(|_| DomainError::validation("page must be greater than or equal to 0"))?;
    if page > MAX_PAGE {
        return Err(DomainError::validation(format!(
            "page must be at most {MAX_PAGE}"
        )));
    }
    Ok(page)
}

pub fn source(catalog: &SourceCatalog, value: &str) -> Result<(), DomainError> {
    if catalog.contains(value) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "db must be one of: {}",
            catalog.describe()
        )))
    }
}
