//! Mod-manager and plugin collaborator traits.
//!
//! The engine does not know how a mod manager stages files or how the game
//! decides which plugins are active; it consumes both through these traits.
//! Test suites and simple pipelines can implement them with fixed lists.

use camino::{Utf8Path, Utf8PathBuf};

/// One file in a mod manager's staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingFile {
    /// Path of the staged file, relative to the staging root.
    pub path: Utf8PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Content checksum as reported by the mod manager.
    pub checksum: u32,
}

/// Mod-manager layer: maps physical files back to the mod that supplied them.
pub trait ModManager {
    /// The mod that owns a physical file, or `None` for the base game.
    fn owner_of(&self, path: &Utf8Path) -> Option<String>;

    /// Mod labels in priority order: index = priority, later = higher.
    fn ordered_mods(&self) -> Vec<String>;

    /// Files currently staged by the mod manager.
    fn staging_files(&self) -> Vec<StagingFile>;
}

/// Plugin/load-order source: supplies the ordered active plugin list.
pub trait PluginSource {
    /// Active plugin file names (e.g. `Dawnguard.esm`), in load order.
    fn active_plugins(&self) -> Vec<String>;
}

impl PluginSource for Vec<String> {
    fn active_plugins(&self) -> Vec<String> {
        self.clone()
    }
}
