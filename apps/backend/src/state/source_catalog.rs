//! The set of data source names accepted by submissions.

use std::collections::BTreeSet;

/// Immutable snapshot of data source names, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCatalog {
    names: BTreeSet<String>,
}

impl SourceCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Comma-separated names, for validation messages.
    pub fn describe(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }
}
