//! The unified asset index.
//!
//! [`AssetIndex`] merges packed-archive contents, loose files, and generated
//! files into a single map from normalized logical path to winning source.
//! Precedence is implemented purely by build order — each step overwrites
//! earlier entries for the same path:
//!
//! 1. Archive contents, in **ascending** load order (lowest priority first).
//!    Every file an archive contains becomes an entry tagged with that archive.
//! 2. Loose files found by a recursive scan of the data directory. A loose
//!    file always beats any archive entry for the same path.
//! 3. Generated files: an optional output-directory scan at populate time,
//!    plus [`add_generated`](AssetIndex::add_generated) calls as the pipeline
//!    materializes derived files during the run.
//!
//! The map key is the normalized path (see [`crate::paths`]); the entry keeps
//! the case-preserved original for display and for case-sensitive archives.
//!
//! After [`populate`](AssetIndex::populate) completes the map is read-only
//! except for `add_generated`, which takes the map's write lock and is safe to
//! call concurrently with lookups from worker threads. Every query made before
//! `populate` fails with [`Error::NotPopulated`](crate::Error::NotPopulated).

use crate::archive::{ArchiveHandle, ArchiveProvider};
use crate::error::{Error, Result};
use crate::filter::IndexFilter;
use crate::game::ModManager;
use crate::glob::{matches_any, Glob};
use crate::load_order::LoadOrder;
use crate::paths::{normalize_path, paths_equal_ignore_case, SEPARATOR};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use walkdir::WalkDir;

/// The active byte source for one indexed path.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file present directly on the filesystem under the data directory.
    Loose,
    /// A file inside the referenced packed archive.
    Archive(Arc<ArchiveHandle>),
    /// A file synthesized by the pipeline during this run.
    Generated,
}

/// One indexed asset: the winning source for a logical path.
#[derive(Debug, Clone)]
pub struct AssetEntry {
    original_path: String,
    source: FileSource,
    owning_mod: Option<String>,
}

impl AssetEntry {
    /// The path exactly as it appeared in the winning source (case preserved,
    /// separators unified to backslashes).
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Label of the mod that contributed the winning source; `None` for the
    /// base game.
    pub fn owning_mod(&self) -> Option<&str> {
        self.owning_mod.as_deref()
    }

    pub fn is_loose(&self) -> bool {
        matches!(self.source, FileSource::Loose)
    }

    pub fn is_archived(&self) -> bool {
        matches!(self.source, FileSource::Archive(_))
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.source, FileSource::Generated)
    }

    /// The owning archive, when the source is [`FileSource::Archive`].
    pub fn archive(&self) -> Option<&ArchiveHandle> {
        match &self.source {
            FileSource::Archive(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Summary of an index build, including the §7-style aggregated warning count.
#[derive(Debug, Clone, Default)]
pub struct PopulateReport {
    /// Archives successfully opened and indexed.
    pub archives_indexed: usize,
    /// Archives skipped because they failed to open.
    pub archives_skipped: usize,
    /// Entries contributed by archives (before loose overwrites).
    pub archive_entries: usize,
    /// Loose files indexed.
    pub loose_files: usize,
    /// Generated files found by the output-directory scan.
    pub generated_files: usize,
    /// Total warnings recorded (skipped archives and unreadable scan entries).
    pub warnings: usize,
}

/// Glob-based query for [`AssetIndex::find`].
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    /// Patterns a path must match (at least one). No patterns, no results.
    pub include: Vec<String>,
    /// Patterns that remove a path from the result.
    pub exclude: Vec<String>,
    /// Patterns matched against the owning archive's file name; archived
    /// entries whose archive matches are removed. Loose and generated entries
    /// are unaffected.
    pub exclude_archives: Vec<String>,
    /// Return normalized (lowercase) paths instead of original-case paths.
    pub lowercase_results: bool,
}

impl FindQuery {
    /// Query matching the given include patterns, with no exclusions.
    pub fn include(patterns: Vec<String>) -> Self {
        Self {
            include: patterns,
            ..Self::default()
        }
    }
}

/// The unified path→source map for one load order.
///
/// Built wholesale by [`populate`](Self::populate) on each run; never persisted.
/// Owns the opened [`ArchiveHandle`]s for the lifetime of the index.
pub struct AssetIndex {
    data_dir: Utf8PathBuf,
    generated_dir: Option<Utf8PathBuf>,
    filter: IndexFilter,
    entries: RwLock<BTreeMap<String, AssetEntry>>,
    archives: Vec<Arc<ArchiveHandle>>,
    archive_order: Vec<String>,
    populated: bool,
}

impl AssetIndex {
    /// Create an empty index for a data directory.
    ///
    /// `generated_dir` is the optional output directory where the pipeline
    /// materializes derived files; when set, its contents are overlaid during
    /// populate and [`add_generated`](Self::add_generated) entries resolve
    /// their bytes under it.
    pub fn new(
        data_dir: Utf8PathBuf,
        generated_dir: Option<Utf8PathBuf>,
        filter: IndexFilter,
    ) -> Self {
        Self {
            data_dir,
            generated_dir,
            filter,
            entries: RwLock::new(BTreeMap::new()),
            archives: Vec::new(),
            archive_order: Vec::new(),
            populated: false,
        }
    }

    /// The data directory this index was built over.
    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    /// Build the map. Runs single-threaded and must complete before any
    /// worker thread queries the index.
    ///
    /// Archive open failures are consumed as "skip this archive" and counted
    /// in the returned report; a single bad archive never aborts the build.
    pub fn populate(
        &mut self,
        load_order: &LoadOrder,
        provider: &dyn ArchiveProvider,
        mod_manager: Option<&dyn ModManager>,
        include_archives: bool,
    ) -> Result<PopulateReport> {
        if !self.data_dir.as_std_path().is_dir() {
            return Err(Error::InvalidDataDir(self.data_dir.clone()));
        }

        let mut report = PopulateReport::default();
        let mut map = BTreeMap::new();
        self.archives.clear();
        self.archive_order.clear();

        if include_archives {
            self.add_archives_to_map(&mut map, load_order, provider, &mut report);
        }

        self.add_loose_files_to_map(&mut map, mod_manager, &mut report)?;
        self.add_generated_files_to_map(&mut map, &mut report)?;

        if let Some(manager) = mod_manager {
            tracing::debug!(
                "Mod manager reports {} staged files",
                manager.staging_files().len()
            );
        }

        tracing::info!(
            "Asset index built: {} entries ({} archives indexed, {} skipped, {} loose, {} generated)",
            map.len(),
            report.archives_indexed,
            report.archives_skipped,
            report.loose_files,
            report.generated_files,
        );

        *self.entries.write() = map;
        self.populated = true;
        Ok(report)
    }

    /// Seed the map with archive contents in ascending load order, so that
    /// later archives overwrite earlier ones per path.
    fn add_archives_to_map(
        &mut self,
        map: &mut BTreeMap<String, AssetEntry>,
        load_order: &LoadOrder,
        provider: &dyn ArchiveProvider,
        report: &mut PopulateReport,
    ) {
        for name in load_order.archives() {
            let archive_path = self.data_dir.join(name);
            let source = match provider.open(&archive_path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Skipping archive '{}': {}", name, e);
                    report.archives_skipped += 1;
                    report.warnings += 1;
                    continue;
                }
            };

            let handle = Arc::new(ArchiveHandle::new(name.clone(), archive_path, source));

            for stored_path in handle.list() {
                let normalized = normalize_path(&stored_path);
                if !self.filter.allows(&normalized) {
                    continue;
                }
                map.insert(
                    normalized,
                    AssetEntry {
                        original_path: stored_path.replace('/', "\\"),
                        source: FileSource::Archive(Arc::clone(&handle)),
                        owning_mod: None,
                    },
                );
                report.archive_entries += 1;
            }

            self.archive_order.push(name.clone());
            self.archives.push(handle);
            report.archives_indexed += 1;
        }
    }

    /// Overlay loose files from a recursive data-directory scan. Loose files
    /// always win over archive entries.
    fn add_loose_files_to_map(
        &self,
        map: &mut BTreeMap<String, AssetEntry>,
        mod_manager: Option<&dyn ModManager>,
        report: &mut PopulateReport,
    ) -> Result<()> {
        for entry in WalkDir::new(self.data_dir.as_std_path()) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", e);
                    report.warnings += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8Path::from_path(entry.path()) {
                Some(p) => p,
                None => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", entry.path().display());
                    report.warnings += 1;
                    continue;
                }
            };

            let rel = path.strip_prefix(&self.data_dir).unwrap_or(path);
            let logical = rel.as_str().replace('/', "\\");
            let normalized = normalize_path(&logical);
            if !self.filter.allows(&normalized) {
                continue;
            }

            let owning_mod = mod_manager.and_then(|m| m.owner_of(path));
            map.insert(
                normalized,
                AssetEntry {
                    original_path: logical,
                    source: FileSource::Loose,
                    owning_mod,
                },
            );
            report.loose_files += 1;
        }
        Ok(())
    }

    /// Overlay files already present in the generated-output directory.
    fn add_generated_files_to_map(
        &self,
        map: &mut BTreeMap<String, AssetEntry>,
        report: &mut PopulateReport,
    ) -> Result<()> {
        let Some(generated_dir) = &self.generated_dir else {
            return Ok(());
        };
        if !generated_dir.as_std_path().is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(generated_dir.as_std_path()) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", e);
                    report.warnings += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = match Utf8Path::from_path(entry.path()) {
                Some(p) => p,
                None => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", entry.path().display());
                    report.warnings += 1;
                    continue;
                }
            };

            let rel = path.strip_prefix(generated_dir).unwrap_or(path);
            let logical = rel.as_str().replace('/', "\\");
            map.insert(
                normalize_path(&logical),
                AssetEntry {
                    original_path: logical,
                    source: FileSource::Generated,
                    owning_mod: None,
                },
            );
            report.generated_files += 1;
        }
        Ok(())
    }

    fn ensure_populated(&self) -> Result<()> {
        if self.populated {
            Ok(())
        } else {
            Err(Error::NotPopulated)
        }
    }

    /// Look up the winning entry for a logical path.
    ///
    /// Returns `Ok(None)` for paths not in the load order; only byte reads
    /// treat a missing path as an error.
    pub fn lookup(&self, path: &str) -> Result<Option<AssetEntry>> {
        self.ensure_populated()?;
        Ok(self.entries.read().get(&normalize_path(path)).cloned())
    }

    /// Whether the path exists in the load order at all.
    pub fn is_file(&self, path: &str) -> Result<bool> {
        Ok(self.lookup(path)?.is_some())
    }

    /// Whether the winning source for the path is a loose file.
    pub fn is_loose(&self, path: &str) -> Result<bool> {
        Ok(self.lookup(path)?.is_some_and(|e| e.is_loose()))
    }

    /// Whether the winning source for the path is an archive.
    pub fn is_archived(&self, path: &str) -> Result<bool> {
        Ok(self.lookup(path)?.is_some_and(|e| e.is_archived()))
    }

    /// Whether the winning source for the path is a generated file.
    pub fn is_generated(&self, path: &str) -> Result<bool> {
        Ok(self.lookup(path)?.is_some_and(|e| e.is_generated()))
    }

    /// The mod that owns the winning version of the path, if any.
    pub fn owning_mod(&self, path: &str) -> Result<Option<String>> {
        Ok(self
            .lookup(path)?
            .and_then(|e| e.owning_mod.clone()))
    }

    /// Record a file the pipeline just materialized, overlaying any existing
    /// entry for the path.
    ///
    /// Safe to call concurrently with lookups and other `add_generated` calls.
    pub fn add_generated(&self, path: &str, owning_mod: Option<String>) -> Result<()> {
        self.ensure_populated()?;
        let logical = path.replace('/', "\\");
        // The caller's case need not match the materialized file's; record
        // the on-disk case so byte reads succeed on case-sensitive
        // filesystems.
        let root = self.generated_dir.as_ref().unwrap_or(&self.data_dir);
        let logical = on_disk_case(root, &logical).unwrap_or(logical);
        tracing::trace!("Generated file indexed: {}", logical);
        self.entries.write().insert(
            normalize_path(&logical),
            AssetEntry {
                original_path: logical,
                source: FileSource::Generated,
                owning_mod,
            },
        );
        Ok(())
    }

    /// Absolute filesystem path of a loose winner, or `None` when the path is
    /// missing or won by another source.
    pub fn loose_file_path(&self, path: &str) -> Result<Option<Utf8PathBuf>> {
        Ok(self.lookup(path)?.and_then(|entry| {
            entry
                .is_loose()
                .then(|| join_logical(&self.data_dir, entry.original_path()))
        }))
    }

    /// Whether the path's winning source is one of the named archives
    /// (case-insensitive archive file names).
    pub fn is_file_in_archives(&self, path: &str, archive_names: &[String]) -> Result<bool> {
        Ok(self.lookup(path)?.is_some_and(|entry| {
            entry.archive().is_some_and(|handle| {
                archive_names
                    .iter()
                    .any(|name| paths_equal_ignore_case(name, handle.name()))
            })
        }))
    }

    /// Whether the path is a directory prefix of at least one indexed file.
    ///
    /// A trailing separator is implied, so `meshes\cam` is not a prefix of
    /// `meshes\cameras\camera1.nif`.
    pub fn is_prefix(&self, path: &str) -> Result<bool> {
        self.ensure_populated()?;
        let mut prefix = normalize_path(path);
        if !prefix.ends_with(SEPARATOR) {
            prefix.push(SEPARATOR);
        }
        let entries = self.entries.read();
        Ok(entries
            .range::<str, _>((
                std::ops::Bound::Included(prefix.as_str()),
                std::ops::Bound::Unbounded,
            ))
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix)))
    }

    /// Archive names successfully indexed, in load order.
    pub fn archive_load_order(&self) -> &[String] {
        &self.archive_order
    }

    /// Number of indexed paths.
    pub fn len(&self) -> Result<usize> {
        self.ensure_populated()?;
        Ok(self.entries.read().len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Glob search over the index keys.
    ///
    /// Each include pattern scans only the sorted key range sharing its
    /// literal prefix, so anchored patterns stay cheap on large indexes.
    /// Results are deduplicated and returned in normalized-key order.
    pub fn find(&self, query: &FindQuery) -> Result<Vec<String>> {
        self.ensure_populated()?;

        let includes = Glob::compile_all(&query.include)?;
        let excludes = Glob::compile_all(&query.exclude)?;
        let archive_excludes = Glob::compile_all(&query.exclude_archives)?;

        let entries = self.entries.read();
        let mut results: BTreeMap<&str, &str> = BTreeMap::new();

        for include in &includes {
            let prefix = include.literal_prefix();
            for (key, entry) in entries.range::<str, _>((
                std::ops::Bound::Included(prefix),
                std::ops::Bound::Unbounded,
            )) {
                if !key.starts_with(prefix) {
                    break;
                }
                if !include.matches_normalized(key) {
                    continue;
                }
                if excludes.iter().any(|g| g.matches_normalized(key)) {
                    continue;
                }
                if let Some(handle) = entry.archive() {
                    if matches_any(handle.name(), &archive_excludes) {
                        continue;
                    }
                }

                let output = if query.lowercase_results {
                    key.as_str()
                } else {
                    entry.original_path()
                };
                results.insert(key.as_str(), output);
            }
        }

        Ok(results.into_values().map(String::from).collect())
    }

    /// Read the bytes of an entry from its active source, uncached.
    ///
    /// Archive extraction uses the case-preserved stored path, since archives
    /// may themselves be case-sensitive.
    pub fn read_source(&self, entry: &AssetEntry) -> Result<Vec<u8>> {
        match &entry.source {
            FileSource::Loose => {
                let path = join_logical(&self.data_dir, entry.original_path());
                Ok(std::fs::read(path.as_std_path())?)
            }
            FileSource::Generated => {
                let root = self.generated_dir.as_ref().unwrap_or(&self.data_dir);
                let path = join_logical(root, entry.original_path());
                Ok(std::fs::read(path.as_std_path())?)
            }
            FileSource::Archive(handle) => handle.extract(entry.original_path()),
        }
    }
}

/// Join a logical (backslash-separated) path onto a filesystem root using
/// platform separators.
fn join_logical(root: &Utf8Path, logical: &str) -> Utf8PathBuf {
    let mut out = root.to_path_buf();
    for part in logical.split('\\') {
        out.push(part);
    }
    out
}

/// Find the on-disk case of a logical path under `root`, matching each
/// component ASCII-case-insensitively. `None` when no such file exists.
fn on_disk_case(root: &Utf8Path, logical: &str) -> Option<String> {
    let mut dir = root.to_path_buf();
    let mut resolved: Vec<String> = Vec::new();
    for part in logical.split('\\') {
        let mut matched = None;
        for entry in std::fs::read_dir(dir.as_std_path()).ok()?.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.eq_ignore_ascii_case(part) {
                matched = Some(name.to_string());
                break;
            }
        }
        let name = matched?;
        dir.push(&name);
        resolved.push(name);
    }
    Some(resolved.join("\\"))
}
