use std::fmt;

use serde::Serialize;

/// Non-fatal data-quality notice collected alongside parse and build results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    CatalogEmpty,
    PackageNotFound {
        name: String,
        required_by: Option<String>,
    },
    MalformedRecord {
        record: usize,
        line: usize,
    },
    DuplicatePackage {
        name: String,
    },
}

impl Diagnostic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogEmpty => "catalog-empty",
            Self::PackageNotFound { .. } => "package-not-found",
            Self::MalformedRecord { .. } => "malformed-record",
            Self::DuplicatePackage { .. } => "duplicate-package",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogEmpty => write!(f, "index contains no named packages"),
            Self::PackageNotFound {
                name,
                required_by: None,
            } => write!(f, "package '{name}' was not found in the index"),
            Self::PackageNotFound {
                name,
                required_by: Some(parent),
            } => write!(
                f,
                "dependency '{name}' of '{parent}' was not found in the index"
            ),
            Self::MalformedRecord { record, line } => write!(
                f,
                "skipped malformed line {line} in record {record}: expected 'key:value'"
            ),
            Self::DuplicatePackage { name } => write!(
                f,
                "package '{name}' appears more than once; the last record wins"
            ),
        }
    }
}
