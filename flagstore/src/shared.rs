//! Lock-guarded flag store handle for concurrent callers
//!
//! The backings are plain values with no internal synchronization. This
//! handle puts one mutex around the whole store so any number of threads can
//! share it.

use std::sync::Arc;

use flagstore_core::{FlagStore, Result, Tier, TieredFlags};
use parking_lot::Mutex;

/// Cloneable handle to one store behind a single lock
#[derive(Debug, Clone)]
pub struct SharedFlags {
    inner: Arc<Mutex<TieredFlags>>,
}

impl SharedFlags {
    /// Wrap an existing store
    pub fn new(flags: TieredFlags) -> Self {
        Self {
            inner: Arc::new(Mutex::new(flags)),
        }
    }

    /// Create an empty store of the given tier
    pub fn with_tier(tier: Tier, capacity: usize) -> Self {
        Self::new(TieredFlags::new(tier, capacity))
    }

    /// Set a flag under the lock
    pub fn set(&self, index: usize) -> Result<()> {
        self.inner.lock().set(index)
    }

    /// Clear a flag under the lock
    pub fn clear(&self, index: usize) {
        self.inner.lock().clear(index)
    }

    /// Read a flag under the lock
    pub fn test(&self, index: usize) -> bool {
        self.inner.lock().test(index)
    }

    /// Flip a flag under the lock and return its new state
    pub fn toggle(&self, index: usize) -> Result<bool> {
        self.inner.lock().toggle(index)
    }

    /// Count set flags under the lock
    pub fn count(&self) -> usize {
        self.inner.lock().count()
    }

    /// Copy the current state out of the lock
    pub fn snapshot(&self) -> TieredFlags {
        self.inner.lock().clone()
    }

    /// Run several operations under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut TieredFlags) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<TieredFlags> for SharedFlags {
    fn from(flags: TieredFlags) -> Self {
        Self::new(flags)
    }
}
