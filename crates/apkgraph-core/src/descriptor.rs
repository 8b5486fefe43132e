use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One package entry of an APKINDEX.
///
/// Only `name` and `depends_raw` drive graph building; the remaining fields
/// are carried through for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: Option<String>,
    #[serde(default)]
    pub depends_raw: String,
    pub description: Option<String>,
    pub origin: Option<String>,
    pub arch: Option<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    pub provides: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Raw dependency tokens in the order they appear in the `D` field.
    pub fn depends(&self) -> impl Iterator<Item = &str> {
        self.depends_raw.split_whitespace()
    }

    pub(crate) fn set_field(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "V" => self.version = Some(value),
            "D" => self.depends_raw = value,
            "T" => self.description = Some(value),
            "o" => self.origin = Some(value),
            "A" => self.arch = Some(value),
            "U" => self.url = Some(value),
            "L" => self.license = Some(value),
            "p" => self.provides = Some(value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }
}
