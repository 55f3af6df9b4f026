//! Error types for reference resolution.
//!
//! Every strategy returns a `ResolveError` instead of swallowing failures, so
//! callers and tests can see why a reference did not resolve. The resolver's
//! compatibility adapters collapse all of them to "unresolved".

use std::io;
use std::path::PathBuf;

/// Failure reported by a content provider collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider refused or could not serve the request.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// Underlying I/O failure while reading provider data.
    #[error("provider I/O: {0}")]
    Io(#[from] io::Error),
}

/// Why a reference did not resolve to a path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No matching row, no declared root, or no usable value.
    #[error("not found: {0}")]
    NotFound(String),
    /// The reference belongs to no known category, or to an unknown sub-type.
    #[error("unsupported reference: {0}")]
    Unsupported(String),
    /// The reference or its document id does not have the expected shape.
    #[error("malformed reference: {0}")]
    Malformed(String),
    /// Materialization failed while writing the local copy.
    #[error("copy to {} failed: {source}", path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A provider query or stream open failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Coarse classification of a `ResolveError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unsupported,
    Malformed,
    Io,
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::NotFound(_) => ErrorKind::NotFound,
            ResolveError::Unsupported(_) => ErrorKind::Unsupported,
            ResolveError::Malformed(_) => ErrorKind::Malformed,
            ResolveError::CopyFailed { .. } | ResolveError::Provider(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        ResolveError::NotFound(what.into())
    }

    pub(crate) fn malformed(what: impl Into<String>) -> Self {
        ResolveError::Malformed(what.into())
    }
}
