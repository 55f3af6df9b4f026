//! Resolution results.

use std::path::{Path, PathBuf};

/// Where a reference's content can be read locally.
///
/// A `DirectPath` is not guaranteed to exist: some strategies return their
/// best candidate without checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// A path the provider's data already lives at.
    DirectPath(PathBuf),
    /// A fresh copy in app-private storage.
    MaterializedCopy(PathBuf),
    Unresolved,
}

impl ResolvedLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedLocation::DirectPath(p) | ResolvedLocation::MaterializedCopy(p) => Some(p),
            ResolvedLocation::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ResolvedLocation::Unresolved)
    }

    /// Path as a string, or `None` for unresolved (the legacy null).
    pub fn into_legacy(self) -> Option<String> {
        self.path().map(|p| p.to_string_lossy().into_owned())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResolvedLocation::DirectPath(_) => "direct",
            ResolvedLocation::MaterializedCopy(_) => "copy",
            ResolvedLocation::Unresolved => "unresolved",
        }
    }
}
