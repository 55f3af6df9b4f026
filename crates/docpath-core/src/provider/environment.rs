//! Fixed storage environment.

use super::StorageEnvironment;
use crate::external_roots::ExternalRoots;
use std::path::PathBuf;

/// A `StorageEnvironment` with roots fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub private_root: PathBuf,
    pub roots: ExternalRoots,
}

impl StaticEnvironment {
    pub fn new(private_root: impl Into<PathBuf>, roots: ExternalRoots) -> Self {
        Self {
            private_root: private_root.into(),
            roots,
        }
    }
}

impl StorageEnvironment for StaticEnvironment {
    fn private_storage_root(&self) -> PathBuf {
        self.private_root.clone()
    }

    fn external_roots(&self) -> ExternalRoots {
        self.roots.clone()
    }
}
