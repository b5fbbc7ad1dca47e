//! Lazy, invalidatable cache of decoded file bytes.
//!
//! [`ByteCache`] sits between patcher workers and the [`AssetIndex`]: a cached
//! read pulls bytes from the entry's active source once and serves every later
//! read from memory. Clearing the cache never changes lookup results — a
//! subsequent read reproduces byte-identical output from the same source.
//!
//! # Locking
//!
//! The check-then-fetch on first access must be atomic as a unit: two workers
//! racing on the same missing path must produce exactly one physical read. The
//! cache keeps a per-path slot behind a short-lived map lock; the fetch itself
//! runs under the slot's own lock, so concurrent first readers of one path
//! serialize on that path only while readers of other paths proceed.

use crate::error::{Error, Result};
use crate::index::AssetIndex;
use crate::paths::normalize_path;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<Mutex<Option<Vec<u8>>>>;

/// Cache of file bytes keyed by normalized path.
#[derive(Default)]
pub struct ByteCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ByteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the bytes for a logical path.
    ///
    /// With `use_cache` the result is retained and later reads return it
    /// without touching the source; without it the cache is bypassed entirely.
    ///
    /// Returns [`Error::NotFound`] when the path is not in the load order —
    /// unlike [`AssetIndex::lookup`], a byte read on a missing path is an
    /// error, distinguishable from I/O failure and from querying an
    /// unpopulated index.
    pub fn read(&self, index: &AssetIndex, path: &str, use_cache: bool) -> Result<Vec<u8>> {
        let entry = index
            .lookup(path)?
            .ok_or_else(|| Error::NotFound(normalize_path(path)))?;

        if !use_cache {
            return index.read_source(&entry);
        }

        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(
                slots
                    .entry(normalize_path(path))
                    .or_insert_with(|| Arc::new(Mutex::new(None))),
            )
        };

        let mut guard = slot.lock();
        if let Some(bytes) = guard.as_ref() {
            return Ok(bytes.clone());
        }

        let bytes = index.read_source(&entry)?;
        *guard = Some(bytes.clone());
        Ok(bytes)
    }

    /// Drop all cached bytes. Lookup results are unaffected; the next read
    /// re-fetches from the unchanged source.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Number of paths with retained bytes.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
