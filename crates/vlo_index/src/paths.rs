//! Logical asset path normalization.
//!
//! The index keys its entries by *normalized* paths: every separator becomes a
//! backslash and ASCII letters are lowercased. Non-ASCII characters are left
//! untouched — normalization is deliberately ASCII-only, matching the target
//! platform's case rules for game asset paths. All comparisons in the engine go
//! through these helpers so that `Textures\Foo.DDS` and `textures/foo.dds`
//! resolve to the same entry.

/// Separator used in normalized logical paths.
pub const SEPARATOR: char = '\\';

/// Normalize a logical asset path.
///
/// Forward slashes become backslashes and ASCII letters are lowercased.
/// Non-ASCII characters pass through unchanged.
pub fn normalize_path(path: &str) -> String {
    path.chars()
        .map(|c| match c {
            '/' => SEPARATOR,
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Check whether two logical paths are equal, ignoring ASCII case and
/// separator style.
pub fn paths_equal_ignore_case(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        // Normalization never changes length, so differing lengths can
        // never compare equal.
        return false;
    }
    a.chars().zip(b.chars()).all(|(ca, cb)| {
        let ca = if ca == '/' { SEPARATOR } else { ca.to_ascii_lowercase() };
        let cb = if cb == '/' { SEPARATOR } else { cb.to_ascii_lowercase() };
        ca == cb
    })
}

/// Check whether every character of the path is ASCII.
pub fn is_path_ascii(path: &str) -> bool {
    path.is_ascii()
}

/// Check whether any component of `path` equals one of `components`
/// (ASCII-case-insensitive). Components are directory or file names between
/// separators.
pub fn any_component_is(path: &str, components: &[String]) -> bool {
    let normalized = normalize_path(path);
    normalized
        .split(SEPARATOR)
        .any(|part| components.iter().any(|c| normalize_path(c) == part))
}

/// Extension of a normalized path including the leading dot, if any.
pub fn extension_of(normalized: &str) -> Option<&str> {
    let file_name = normalized.rsplit(SEPARATOR).next()?;
    file_name.rfind('.').map(|idx| &file_name[idx..])
}

/// File stem of a normalized path (file name without its last extension).
pub fn stem_of(normalized: &str) -> &str {
    let file_name = normalized.rsplit(SEPARATOR).next().unwrap_or(normalized);
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}
