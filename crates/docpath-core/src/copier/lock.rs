//! Directory-scoped locks serializing materialization per destination root.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, PoisonError};

/// Set of destination directories currently being written to.
///
/// `lock` blocks while another caller holds the same directory; different
/// directories never wait on each other.
#[derive(Debug, Default)]
pub struct DirectoryLocks {
    held: Mutex<HashSet<PathBuf>>,
    released: Condvar,
}

impl DirectoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `dir`, released when the guard drops.
    pub fn lock(&self, dir: &Path) -> DirectoryGuard<'_> {
        let key = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.clone());
        DirectoryGuard { locks: self, key }
    }

    pub fn held_count(&self) -> usize {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases its directory when dropped.
#[derive(Debug)]
pub struct DirectoryGuard<'a> {
    locks: &'a DirectoryLocks,
    key: PathBuf,
}

impl Drop for DirectoryGuard<'_> {
    fn drop(&mut self) {
        self.locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
        self.locks.released.notify_all();
    }
}
