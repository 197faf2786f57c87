//! URL equivalence and declared-path resolution.
//!
//! Every URL comparison in the audit ignores at most one trailing slash on
//! each side; query strings and fragments are compared verbatim.

use url::Url;

/// True when the value carries an explicit scheme instead of being
/// site-relative.
pub fn is_fully_qualified(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Strip at most one trailing slash.
fn strip_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}

/// Trailing-slash-insensitive equality.
pub fn equivalent(a: &str, b: &str) -> bool {
    strip_trailing_slash(a) == strip_trailing_slash(b)
}

/// Resolve a declared path (or already fully-qualified URL) against the
/// audit base.
pub fn resolve_declared(base: &Url, declared: &str) -> Result<Url, url::ParseError> {
    if is_fully_qualified(declared) {
        Url::parse(declared)
    } else {
        base.join(declared)
    }
}
