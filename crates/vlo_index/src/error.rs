//! Error types for load-order resolution and asset indexing.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. The variants separate the three failure classes callers
//! handle differently: precondition violations ([`NotPopulated`](Error::NotPopulated)),
//! missing assets ([`NotFound`](Error::NotFound)), and source I/O failures
//! ([`Io`](Error::Io) / [`Archive`](Error::Archive)).

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving the load order or querying the index.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (loose file read, directory scan, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON (filter config).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The index was queried before [`populate`](crate::AssetIndex::populate) ran.
    ///
    /// Fatal to the calling operation, not to the process.
    #[error("asset index queried before populate()")]
    NotPopulated,

    /// A byte read was requested for a path that is not in the load order.
    ///
    /// Distinct from I/O failure: the path simply resolves to nothing.
    #[error("no such asset in the load order: {0}")]
    NotFound(String),

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// An archive collaborator failed to open or extract.
    ///
    /// During `populate` this is consumed as "skip this archive"; during a byte
    /// read it is reported to the immediate caller only.
    #[error("archive '{archive}': {message}")]
    Archive { archive: String, message: String },

    /// The configured data directory does not exist or is not a directory.
    #[error("invalid data directory: {0}")]
    InvalidDataDir(Utf8PathBuf),
}
