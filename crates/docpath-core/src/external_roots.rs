//! External storage roots and the existence probe over them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the secondary (often removable) storage root.
pub const SECONDARY_STORAGE_ENV: &str = "SECONDARY_STORAGE";
/// Environment variable naming the external storage root.
pub const EXTERNAL_STORAGE_ENV: &str = "EXTERNAL_STORAGE";

/// Declared storage mount points. `None` means not declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRoots {
    #[serde(default)]
    pub primary: Option<PathBuf>,
    #[serde(default)]
    pub secondary: Option<PathBuf>,
    #[serde(default)]
    pub external: Option<PathBuf>,
}

impl ExternalRoots {
    /// Primary root as given; secondary and external from the process environment.
    pub fn from_env(primary: Option<PathBuf>) -> Self {
        Self::from_lookup(primary, |key| std::env::var(key).ok())
    }

    /// Like `from_env` with an explicit variable lookup. Empty values count as undeclared.
    pub fn from_lookup<F>(primary: Option<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let declared = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            primary,
            secondary: declared(SECONDARY_STORAGE_ENV),
            external: declared(EXTERNAL_STORAGE_ENV),
        }
    }

    /// Fills undeclared roots from `other`.
    pub fn or(self, other: ExternalRoots) -> Self {
        Self {
            primary: self.primary.or(other.primary),
            secondary: self.secondary.or(other.secondary),
            external: self.external.or(other.external),
        }
    }

    /// Roots probed for non-primary volumes, in probe order: secondary, then external.
    pub fn fallback_roots(&self) -> Vec<&Path> {
        [self.secondary.as_deref(), self.external.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Result of probing a list of roots for a relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The relative path exists under this root.
    Found(PathBuf),
    /// No root had it; this is the last candidate constructed.
    Missing(PathBuf),
    /// No roots to probe.
    NoRoots,
}

impl Probe {
    /// Path worth returning, if any: a hit, or the last candidate.
    pub fn best_effort(self) -> Option<PathBuf> {
        match self {
            Probe::Found(p) | Probe::Missing(p) => Some(p),
            Probe::NoRoots => None,
        }
    }
}

/// Joins `relative` under `root` as `root/relative`, ignoring leading slashes on `relative`.
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches('/'))
}

/// Probes `roots` in order and returns the first `root/relative` that exists.
pub fn probe_relative(roots: &[&Path], relative: &str) -> Probe {
    let mut last = None;
    for root in roots {
        let candidate = join_relative(root, relative);
        tracing::debug!(candidate = %candidate.display(), "probing storage root");
        if candidate.exists() {
            return Probe::Found(candidate);
        }
        last = Some(candidate);
    }
    match last {
        Some(p) => Probe::Missing(p),
        None => Probe::NoRoots,
    }
}
