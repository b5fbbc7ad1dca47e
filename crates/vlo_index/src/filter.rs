//! Scan-time inclusion rules.
//!
//! During population, every candidate file passes through an [`IndexFilter`]
//! before it can become an entry. Filtered files never enter the index at all —
//! this is how script sources, plugin binaries, and the archive containers
//! themselves stay out of the asset namespace.

use crate::error::Result;
use crate::paths::{any_component_is, extension_of, normalize_path};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Blocklists applied while scanning archives and loose files.
///
/// Loadable from a JSON object:
///
/// ```json
/// {
///   "extension_blocklist": [".pex", ".psc"],
///   "component_blocklist": ["source", "cache"]
/// }
/// ```
///
/// Blocklist components are single directory or file names; a file is
/// excluded when any one of its path components equals an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexFilter {
    /// File extensions (with leading dot) that never enter the index.
    #[serde(default)]
    pub extension_blocklist: Vec<String>,

    /// Path components that exclude a file when any component matches.
    #[serde(default)]
    pub component_blocklist: Vec<String>,
}

impl IndexFilter {
    /// Default rules for a game data directory: archives and plugin binaries
    /// are reachable through their own channels, never as loose asset entries.
    pub fn game_default() -> Self {
        Self {
            extension_blocklist: [".bsa", ".esp", ".esm", ".esl"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            component_blocklist: Vec::new(),
        }
    }

    /// Load a filter from a JSON file and normalize its entries.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_std_path())?;
        let mut filter: Self = serde_json::from_str(&contents)?;
        filter.extension_blocklist = filter
            .extension_blocklist
            .iter()
            .map(|e| normalize_path(e))
            .collect();
        filter.component_blocklist = filter
            .component_blocklist
            .iter()
            .map(|c| normalize_path(c))
            .collect();
        Ok(filter)
    }

    /// Merge another filter's entries into this one.
    pub fn extend(&mut self, other: &IndexFilter) {
        self.extension_blocklist
            .extend(other.extension_blocklist.iter().cloned());
        self.component_blocklist
            .extend(other.component_blocklist.iter().cloned());
    }

    /// Whether a file may enter the index. Expects a normalized path.
    pub fn allows(&self, normalized: &str) -> bool {
        if let Some(ext) = extension_of(normalized) {
            if self
                .extension_blocklist
                .iter()
                .any(|blocked| normalize_path(blocked) == ext)
            {
                return false;
            }
        }

        if any_component_is(normalized, &self.component_blocklist) {
            return false;
        }

        true
    }
}
