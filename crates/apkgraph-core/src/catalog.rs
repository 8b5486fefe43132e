use std::collections::BTreeMap;

use crate::descriptor::PackageDescriptor;
use crate::parser::parse_index;

/// Trims and case-folds a package name into its catalog key form.
pub fn normalize_package_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Package name to descriptor map. Read-only once parsing has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    packages: BTreeMap<String, PackageDescriptor>,
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses index text, discarding diagnostics.
    pub fn parse(text: &str) -> Self {
        parse_index(text).catalog
    }

    /// Inserts a descriptor under its normalized name, returning the entry it
    /// replaced. Later records win over earlier ones.
    pub fn insert(&mut self, mut descriptor: PackageDescriptor) -> Option<PackageDescriptor> {
        let key = normalize_package_name(&descriptor.name);
        descriptor.name = key.clone();
        self.packages.insert(key, descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.get(&normalize_package_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.values()
    }

    /// Names containing `query`, exact match first, then alphabetical.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = normalize_package_name(query);
        let mut matches: Vec<&str> = self
            .names()
            .filter(|name| name.contains(needle.as_str()))
            .collect();
        matches.sort_by_key(|name| (*name != needle, *name));
        matches
    }
}

impl FromIterator<PackageDescriptor> for PackageCatalog {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}
