use std::fmt;

use lazy_regex::{lazy_regex, Lazy, Regex};

/// Canonical GUID (either case), anywhere in the input.
static GUID: Lazy<Regex> = lazy_regex!(
    r"\b([0-9A-Fa-f]{8})-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\b"
);

/// Standard email address.
static EMAIL: Lazy<Regex> = lazy_regex!(r"\b([A-Za-z0-9._%+-])[A-Za-z0-9._%+-]*(@[A-Za-z0-9.-]+\.[A-Za-z]{1,})\b");

/// Masks person identifiers before they reach the logs.
///
/// - GUIDs keep their first block: `AAAAAAAA-****`
/// - Emails keep the first character of the local part and the domain
pub fn redact(input: &str) -> String {
    let guids = GUID.replace_all(input, "$1-****");
    EMAIL.replace_all(&guids, "$1***$2").into_owned()
}

/// Display/Debug wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
