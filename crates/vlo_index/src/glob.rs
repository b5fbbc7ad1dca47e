//! MS-DOS-style glob matching over normalized asset paths.
//!
//! Globs support a single wildcard: `*` matches any run of characters,
//! *including* path separators. Matching is case-insensitive because both the
//! pattern and the candidate are run through
//! [`normalize_path`](crate::paths::normalize_path) first; the compiled regex
//! itself is exact.
//!
//! [`Glob::literal_prefix`] exposes the longest literal prefix before the first
//! `*`, which the index uses to range-scan its sorted key map instead of
//! testing every entry against every pattern.

use crate::error::{Error, Result};
use crate::paths::normalize_path;
use regex::Regex;

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Regex,
    prefix: String,
}

impl Glob {
    /// Compile a glob pattern.
    ///
    /// The pattern is normalized (lowercased, separators unified) before
    /// compilation, so `Meshes/*.NIF` and `meshes\*.nif` compile identically.
    pub fn new(pattern: &str) -> Result<Self> {
        let normalized = normalize_path(pattern);

        let mut source = String::with_capacity(normalized.len() + 8);
        source.push('^');
        for (i, segment) in normalized.split('*').enumerate() {
            if i > 0 {
                // A single star crosses separators, per the original engine's
                // wildcard rules.
                source.push_str(".*");
            }
            source.push_str(&regex::escape(segment));
        }
        source.push('$');

        let prefix = normalized
            .split('*')
            .next()
            .unwrap_or_default()
            .to_string();

        // The pattern is fully escaped apart from `.*` insertions, so only
        // resource limits can fail compilation.
        let regex = Regex::new(&source).map_err(|e| Error::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { regex, prefix })
    }

    /// Compile a list of patterns.
    pub fn compile_all(patterns: &[String]) -> Result<Vec<Glob>> {
        patterns.iter().map(|p| Glob::new(p)).collect()
    }

    /// Test a path against this glob. The path is normalized before matching.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(&normalize_path(path))
    }

    /// Test an already-normalized path without re-normalizing.
    pub(crate) fn matches_normalized(&self, normalized: &str) -> bool {
        self.regex.is_match(normalized)
    }

    /// Longest literal (wildcard-free) prefix of the normalized pattern.
    ///
    /// Empty when the pattern starts with `*`.
    pub fn literal_prefix(&self) -> &str {
        &self.prefix
    }
}

/// Check whether any glob in the list matches the given path.
pub fn matches_any(path: &str, globs: &[Glob]) -> bool {
    let normalized = normalize_path(path);
    globs.iter().any(|g| g.matches_normalized(&normalized))
}
