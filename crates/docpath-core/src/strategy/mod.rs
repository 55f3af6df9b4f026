//! Per-category resolution strategies.
//!
//! `Strategy` is a closed set: one variant per provider category, with the
//! tier-gated categories carrying the tier they were selected for. Every
//! variant resolves through the same `resolve` entry point.

mod direct;
mod downloads;
mod external_storage;
mod media;
mod stream_only;

pub use downloads::{MY_DOWNLOADS_ROOT, PUBLIC_DOWNLOADS_ROOT, RAW_PREFIX};
pub use media::{AUDIO_COLLECTION, IMAGE_COLLECTION, VIDEO_COLLECTION};

use crate::classify::{classify, CapabilityTier, ProviderCategory};
use crate::copier::DirectoryLocks;
use crate::error::ResolveError;
use crate::location::ResolvedLocation;
use crate::provider::{ContentProvider, StorageEnvironment};
use crate::reference::DocumentReference;
use crate::resolver::ResolverSettings;
use std::fmt;

/// Collaborators and settings shared by all strategies for one call.
pub struct ResolveContext<'a> {
    pub provider: &'a dyn ContentProvider,
    pub environment: &'a dyn StorageEnvironment,
    pub settings: &'a ResolverSettings,
    pub locks: &'a DirectoryLocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExternalStorage,
    Downloads { tier: CapabilityTier },
    Media,
    Drive,
    WhatsApp,
    GooglePhotos,
    GenericContent { tier: CapabilityTier },
    FileScheme,
    Unsupported,
}

impl Strategy {
    /// The strategy servicing `category` at `tier`.
    pub fn select(category: ProviderCategory, tier: CapabilityTier) -> Self {
        match category {
            ProviderCategory::ExternalStorage => Strategy::ExternalStorage,
            ProviderCategory::Downloads => Strategy::Downloads { tier },
            ProviderCategory::Media => Strategy::Media,
            ProviderCategory::Drive => Strategy::Drive,
            ProviderCategory::WhatsApp => Strategy::WhatsApp,
            ProviderCategory::GooglePhotos => Strategy::GooglePhotos,
            ProviderCategory::GenericContent => Strategy::GenericContent { tier },
            ProviderCategory::FileScheme => Strategy::FileScheme,
            ProviderCategory::Unsupported => Strategy::Unsupported,
        }
    }

    /// Classifies `reference` and selects its strategy.
    pub fn for_reference(reference: &DocumentReference, tier: CapabilityTier) -> Self {
        Self::select(classify(reference), tier)
    }

    pub fn category(&self) -> ProviderCategory {
        match self {
            Strategy::ExternalStorage => ProviderCategory::ExternalStorage,
            Strategy::Downloads { .. } => ProviderCategory::Downloads,
            Strategy::Media => ProviderCategory::Media,
            Strategy::Drive => ProviderCategory::Drive,
            Strategy::WhatsApp => ProviderCategory::WhatsApp,
            Strategy::GooglePhotos => ProviderCategory::GooglePhotos,
            Strategy::GenericContent { .. } => ProviderCategory::GenericContent,
            Strategy::FileScheme => ProviderCategory::FileScheme,
            Strategy::Unsupported => ProviderCategory::Unsupported,
        }
    }

    /// True if this strategy copies bytes rather than finding a path.
    pub fn materializes(&self) -> bool {
        match self {
            Strategy::Drive | Strategy::WhatsApp => true,
            Strategy::GenericContent { tier } => *tier >= CapabilityTier::ScopedStorageEnforced,
            _ => false,
        }
    }

    pub fn resolve(
        &self,
        reference: &DocumentReference,
        ctx: &ResolveContext<'_>,
    ) -> Result<ResolvedLocation, ResolveError> {
        tracing::debug!(strategy = %self, reference = %reference, "resolving");
        match *self {
            Strategy::ExternalStorage => external_storage::resolve(reference, ctx),
            Strategy::Downloads { tier } => downloads::resolve(reference, tier, ctx),
            Strategy::Media => media::resolve(reference, ctx),
            Strategy::Drive => stream_only::resolve_drive(reference, ctx),
            Strategy::WhatsApp => stream_only::resolve_whatsapp(reference, ctx),
            Strategy::GooglePhotos => direct::resolve_google_photos(reference),
            Strategy::GenericContent { tier } => stream_only::resolve_generic(reference, tier, ctx),
            Strategy::FileScheme => direct::resolve_file(reference),
            Strategy::Unsupported => Err(ResolveError::Unsupported(format!(
                "no strategy for scheme {:?} authority {:?}",
                reference.scheme(),
                reference.authority()
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Downloads { tier } | Strategy::GenericContent { tier } => {
                write!(f, "{}@{}", self.category(), tier)
            }
            _ => write!(f, "{}", self.category()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::external_roots::ExternalRoots;
    use crate::provider::{MemoryProvider, StaticEnvironment};
    use std::path::Path;

    /// Owns everything a `ResolveContext` borrows.
    pub(crate) struct Harness {
        pub provider: MemoryProvider,
        pub environment: StaticEnvironment,
        pub settings: ResolverSettings,
        pub locks: DirectoryLocks,
    }

    impl Harness {
        pub(crate) fn new(provider: MemoryProvider, private_root: &Path, roots: ExternalRoots) -> Self {
            Self {
                provider,
                environment: StaticEnvironment::new(private_root, roots),
                settings: ResolverSettings::default(),
                locks: DirectoryLocks::new(),
            }
        }

        pub(crate) fn ctx(&self) -> ResolveContext<'_> {
            ResolveContext {
                provider: &self.provider,
                environment: &self.environment,
                settings: &self.settings,
                locks: &self.locks,
            }
        }
    }

    pub(crate) fn reference(raw: &str) -> DocumentReference {
        DocumentReference::parse(raw).unwrap()
    }
}
