//! Archive load-order resolution.
//!
//! [`LoadOrderResolver`] computes the ordered list of packed archives that are
//! active for a run:
//!
//! 1. Archives declared in global configuration files, in declaration order,
//!    deduplicated case-insensitively.
//! 2. For each active plugin in load order, archives whose stem matches the
//!    plugin's stem (case-insensitive), including numeric-suffix variants
//!    (`Plugin.bsa`, `Plugin0.bsa`, `Plugin1.bsa`).
//! 3. Any remaining archive physically present in the data directory,
//!    appended last.
//!
//! The resulting position defines precedence downstream: **later entries beat
//! earlier ones**. The resolver also computes an xxHash3 fingerprint from the
//! names, sizes, and modification times of the resolved archives, so a
//! pipeline can detect a changed load order between runs.
//!
//! Missing declared archives are kept in the order (with a warning) — the
//! index skips them when opening fails, and a single bad archive never aborts
//! resolution.

use crate::error::Result;
use crate::game::PluginSource;
use crate::paths::{normalize_path, stem_of};
use camino::Utf8PathBuf;
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64;

/// Resolved archive load order.
#[derive(Debug, Clone)]
pub struct LoadOrder {
    archives: Vec<String>,
    fingerprint: u64,
}

impl LoadOrder {
    /// Archive file names in load order. Index *i* beats index *j* when
    /// *i* > *j*.
    pub fn archives(&self) -> &[String] {
        &self.archives
    }

    /// xxHash3 fingerprint of the resolved list (names + sizes + mtimes).
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}

/// Computes the active archive list for a data directory.
///
/// Configure with [`with_declared_archives`](Self::with_declared_archives) and
/// [`with_plugin_source`](Self::with_plugin_source), then call
/// [`resolve`](Self::resolve).
pub struct LoadOrderResolver {
    data_dir: Utf8PathBuf,
    archive_extension: String,
    declared: Vec<String>,
    plugins: Vec<String>,
}

impl LoadOrderResolver {
    /// Create a resolver for the given data directory. The archive extension
    /// defaults to `bsa`.
    pub fn new(data_dir: Utf8PathBuf) -> Self {
        Self {
            data_dir,
            archive_extension: "bsa".to_string(),
            declared: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Override the archive file extension (without the leading dot).
    pub fn with_archive_extension(mut self, extension: &str) -> Self {
        self.archive_extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Archive names referenced by global configuration files, in file order.
    pub fn with_declared_archives(mut self, archives: Vec<String>) -> Self {
        self.declared = archives;
        self
    }

    /// Pull the active plugin list from a [`PluginSource`].
    pub fn with_plugin_source(mut self, plugins: &dyn PluginSource) -> Self {
        self.plugins = plugins.active_plugins();
        self
    }

    /// Resolve the ordered archive list.
    pub fn resolve(&self) -> Result<LoadOrder> {
        let on_disk = self.archives_in_directory()?;

        let mut ordered: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        // 1. Declared archives, declaration order, case-insensitive dedup.
        for name in &self.declared {
            let key = normalize_path(name);
            if seen.insert(key) {
                if !on_disk
                    .iter()
                    .any(|d| normalize_path(d) == normalize_path(name))
                {
                    tracing::warn!("Declared archive not present on disk: {}", name);
                }
                ordered.push(name.clone());
            }
        }

        // 2. Plugin-coupled archives, plugin load order.
        for plugin in &self.plugins {
            let plugin_stem = stem_of(&normalize_path(plugin)).to_string();
            for name in &on_disk {
                if !archive_matches_plugin(name, &plugin_stem) {
                    continue;
                }
                let key = normalize_path(name);
                if seen.insert(key) {
                    tracing::debug!("Archive '{}' loads with plugin '{}'", name, plugin);
                    ordered.push(name.clone());
                }
            }
        }

        // 3. Leftover on-disk archives, loaded last.
        for name in &on_disk {
            let key = normalize_path(name);
            if seen.insert(key) {
                ordered.push(name.clone());
            }
        }

        let fingerprint = self.fingerprint_of(&ordered);

        tracing::info!(
            "Resolved load order: {} archives ({} declared, {} plugins), fingerprint {:016x}",
            ordered.len(),
            self.declared.len(),
            self.plugins.len(),
            fingerprint
        );

        Ok(LoadOrder {
            archives: ordered,
            fingerprint,
        })
    }

    /// Archives physically present at the top level of the data directory,
    /// sorted case-insensitively so the result is stable across filesystems.
    fn archives_in_directory(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if !self.data_dir.as_std_path().is_dir() {
            return Err(crate::error::Error::InvalidDataDir(self.data_dir.clone()));
        }

        for entry in std::fs::read_dir(self.data_dir.as_std_path())? {
            let entry = entry?;
            let path = match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(p) => p,
                Err(p) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                    continue;
                }
            };

            if path.as_std_path().is_dir() {
                continue;
            }

            let Some(name) = path.file_name() else {
                continue;
            };

            let matches_ext = name
                .rsplit('.')
                .next()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.archive_extension));
            if matches_ext && name.contains('.') {
                names.push(name.to_string());
            }
        }

        names.sort_by_key(|n| normalize_path(n));
        Ok(names)
    }

    fn fingerprint_of(&self, ordered: &[String]) -> u64 {
        let mut input = Vec::new();
        for name in ordered {
            input.extend_from_slice(normalize_path(name).as_bytes());
            let path = self.data_dir.join(name);
            if let Ok(metadata) = std::fs::metadata(path.as_std_path()) {
                input.extend_from_slice(&metadata.len().to_le_bytes());
                if let Ok(modified) = metadata.modified() {
                    if let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH) {
                        input.extend_from_slice(&duration.as_secs().to_le_bytes());
                    }
                }
            }
        }
        xxh3_64(&input)
    }
}

/// Does an archive name belong to a plugin stem? Exact stem match, or the stem
/// followed by a decimal suffix (`plugin0`, `plugin1`, ...).
fn archive_matches_plugin(archive_name: &str, plugin_stem: &str) -> bool {
    let archive_stem = stem_of(&normalize_path(archive_name)).to_string();
    if archive_stem == plugin_stem {
        return true;
    }
    match archive_stem.strip_prefix(plugin_stem) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
