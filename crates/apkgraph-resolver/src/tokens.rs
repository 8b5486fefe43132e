use apkgraph_core::normalize_package_name;

const CONSTRAINT_OPERATORS: [char; 4] = ['<', '>', '=', '~'];

/// Cuts a dependency token at its first version operator.
///
/// `foo>=1.2` becomes `foo`, `so:libc.musl-x86_64.so.1` is returned as-is.
pub fn strip_version_constraint(token: &str) -> &str {
    match token.find(CONSTRAINT_OPERATORS) {
        Some(index) => &token[..index],
        None => token,
    }
}

/// Normalized package name a `D` token refers to, or `None` for conflict
/// markers (`!name`) and tokens that are empty once stripped.
pub fn dependency_name(token: &str) -> Option<String> {
    let token = token.trim();
    if token.starts_with('!') {
        return None;
    }
    let name = normalize_package_name(strip_version_constraint(token));
    (!name.is_empty()).then_some(name)
}
