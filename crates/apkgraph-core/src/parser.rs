use crate::catalog::{normalize_package_name, PackageCatalog};
use crate::descriptor::PackageDescriptor;
use crate::diagnostic::Diagnostic;

const NAME_KEY: &str = "P";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIndex {
    pub catalog: PackageCatalog,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses APKINDEX text into a catalog.
///
/// Records are separated by a blank line and hold `key:value` lines split on
/// the first colon. Lines without a colon or with an empty key are skipped
/// and reported. Records without a `P` field are dropped. Nothing here is
/// fatal: an input with no named records yields an empty catalog plus a
/// [`Diagnostic::CatalogEmpty`].
pub fn parse_index(text: &str) -> ParsedIndex {
    let normalized = text.replace("\r\n", "\n");
    let mut parsed = ParsedIndex::default();

    let records = normalized
        .split("\n\n")
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty());
    for (record_index, record) in records.enumerate() {
        let Some(descriptor) = parse_record(record, record_index + 1, &mut parsed.diagnostics)
        else {
            continue;
        };
        let name = descriptor.name.clone();
        if parsed.catalog.insert(descriptor).is_some() {
            parsed
                .diagnostics
                .push(Diagnostic::DuplicatePackage { name });
        }
    }

    if parsed.catalog.is_empty() {
        parsed.diagnostics.push(Diagnostic::CatalogEmpty);
    }
    parsed
}

fn parse_record(
    record: &str,
    record_number: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PackageDescriptor> {
    let mut descriptor = PackageDescriptor::default();
    let mut has_name = false;

    for (line_index, line) in record.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            diagnostics.push(Diagnostic::MalformedRecord {
                record: record_number,
                line: line_index + 1,
            });
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            diagnostics.push(Diagnostic::MalformedRecord {
                record: record_number,
                line: line_index + 1,
            });
            continue;
        }

        if key == NAME_KEY {
            descriptor.name = normalize_package_name(value);
            has_name = true;
        } else {
            descriptor.set_field(key, value);
        }
    }

    (has_name && !descriptor.name.is_empty()).then_some(descriptor)
}
