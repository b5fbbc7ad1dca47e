//! Virtual load-order resolution for moddable game data directories.
//!
//! This crate builds one deterministic answer to the question "which physical
//! bytes supply this logical asset path?" for an installed game with packed
//! archives, loose override files, and a mod-manager-defined load order.
//! It provides:
//!
//! - **Load-order resolution**: combine configuration-declared archives,
//!   plugin-coupled archives, and leftovers on disk into one ordered list
//!   ([`LoadOrderResolver`]).
//! - **Unified asset index**: merge archive contents, loose files, and
//!   generated files into a single case-insensitive path→source map where
//!   later sources overwrite earlier ones ([`AssetIndex`]).
//! - **Byte cache**: lazy, invalidatable bytes keyed by resolved path, with
//!   at-most-one physical read per path under concurrency ([`ByteCache`]).
//! - **Glob search**: wildcard queries over the index with include/exclude
//!   filtering by path and by owning archive ([`AssetIndex::find`]).
//!
//! Archive container parsing, mod-manager staging, and plugin activation are
//! consumed through the [`ArchiveProvider`], [`ModManager`], and
//! [`PluginSource`] traits — this crate never touches binary formats itself.
//!
//! # Example
//!
//! ```no_run
//! use vlo_index::{AssetIndex, ByteCache, FindQuery, IndexFilter, LoadOrderResolver};
//! use camino::Utf8PathBuf;
//!
//! # fn main() -> vlo_index::Result<()> {
//! # let provider: Box<dyn vlo_index::ArchiveProvider> = unimplemented!();
//! let data_dir = Utf8PathBuf::from("C:/Games/Skyrim/Data");
//! let plugins = vec!["Skyrim.esm".to_string()];
//!
//! let load_order = LoadOrderResolver::new(data_dir.clone())
//!     .with_declared_archives(vec!["Skyrim - Textures.bsa".to_string()])
//!     .with_plugin_source(&plugins)
//!     .resolve()?;
//!
//! let mut index = AssetIndex::new(data_dir, None, IndexFilter::game_default());
//! let report = index.populate(&load_order, provider.as_ref(), None, true)?;
//! println!("{} archives skipped", report.archives_skipped);
//!
//! let cache = ByteCache::new();
//! let bytes = cache.read(&index, "textures\\armor\\helmet.dds", true)?;
//! let meshes = index.find(&FindQuery::include(vec!["meshes\\*.nif".to_string()]))?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod cache;
pub mod error;
pub mod filter;
pub mod game;
pub mod glob;
pub mod index;
pub mod load_order;
pub mod paths;

// Re-export main types
pub use archive::{ArchiveHandle, ArchiveProvider, ArchiveSource};
pub use cache::ByteCache;
pub use error::{Error, Result};
pub use filter::IndexFilter;
pub use game::{ModManager, PluginSource, StagingFile};
pub use index::{AssetEntry, AssetIndex, FileSource, FindQuery, PopulateReport};
pub use load_order::{LoadOrder, LoadOrderResolver};
