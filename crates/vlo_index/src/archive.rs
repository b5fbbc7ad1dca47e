//! Packed-archive collaborator traits.
//!
//! This module defines the seam between the index and whatever format library
//! actually parses archive containers. The engine never touches the binary
//! layout of an archive: it asks an [`ArchiveProvider`] to open one, lists the
//! logical paths it contains, and extracts bytes on demand.
//!
//! A corrupt or unreadable archive surfaces as an error from
//! [`ArchiveProvider::open`] or [`ArchiveSource::extract`]; the index consumes
//! open failures as "skip this archive" during population.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};

/// An opened archive container.
///
/// Implementations must be [`Send`] + [`Sync`]: once populated, many worker
/// threads extract from the same archive concurrently.
pub trait ArchiveSource: Send + Sync {
    /// List every logical path the archive contains, case preserved as stored.
    fn list(&self) -> Vec<String>;

    /// Extract the bytes for one contained path.
    ///
    /// The path is passed exactly as it appeared in [`list`](Self::list) —
    /// archives may be case-sensitive even though the index is not.
    fn extract(&self, path: &str) -> Result<Vec<u8>>;
}

/// Opens archive containers from disk.
pub trait ArchiveProvider {
    /// Open the archive at `path`.
    ///
    /// Returns an error for missing or corrupt containers; the caller decides
    /// whether that is fatal (it is not during index population).
    fn open(&self, path: &Utf8Path) -> Result<Box<dyn ArchiveSource>>;
}

/// An opened archive together with its identity in the load order.
///
/// Owned exclusively by the [`AssetIndex`](crate::AssetIndex); entries hold
/// [`Arc`](std::sync::Arc) references to it, so its lifetime is tied to the
/// index, not to any single entry.
pub struct ArchiveHandle {
    name: String,
    path: Utf8PathBuf,
    source: Box<dyn ArchiveSource>,
}

impl ArchiveHandle {
    pub(crate) fn new(name: String, path: Utf8PathBuf, source: Box<dyn ArchiveSource>) -> Self {
        Self { name, path, source }
    }

    /// Archive file name, case preserved (e.g. `Skyrim - Textures5.bsa`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the archive on disk.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Extract a contained file using its case-preserved stored path.
    pub fn extract(&self, stored_path: &str) -> Result<Vec<u8>> {
        self.source.extract(stored_path)
    }

    pub(crate) fn list(&self) -> Vec<String> {
        self.source.list()
    }
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
