mod catalog;
mod descriptor;
mod diagnostic;
mod parser;

pub use catalog::{normalize_package_name, PackageCatalog};
pub use descriptor::PackageDescriptor;
pub use diagnostic::Diagnostic;
pub use parser::{parse_index, ParsedIndex};
