//! Resolution entry point: parse, classify, dispatch.

use crate::classify::CapabilityTier;
use crate::copier::{CopySettings, DirectoryLocks};
use crate::error::ResolveError;
use crate::location::ResolvedLocation;
use crate::provider::{ContentProvider, StorageEnvironment};
use crate::reference::DocumentReference;
use crate::strategy::{ResolveContext, Strategy};

/// Tunables shared by every strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Directory under the primary root holding downloads by display name.
    pub downloads_dir: String,
    /// Private subdirectory receiving WhatsApp copies.
    pub whatsapp_dir: String,
    pub copy: CopySettings,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            downloads_dir: "Download".to_string(),
            whatsapp_dir: "whatsapp".to_string(),
            copy: CopySettings::default(),
        }
    }
}

/// Resolves document references against one provider and storage environment.
///
/// Holds no per-call state apart from the directory lock table, so a single
/// resolver can serve concurrent callers when its collaborators are `Sync`.
pub struct Resolver<P, E> {
    provider: P,
    environment: E,
    settings: ResolverSettings,
    locks: DirectoryLocks,
}

impl<P: ContentProvider, E: StorageEnvironment> Resolver<P, E> {
    pub fn new(provider: P, environment: E) -> Self {
        Self::with_settings(provider, environment, ResolverSettings::default())
    }

    pub fn with_settings(provider: P, environment: E, settings: ResolverSettings) -> Self {
        Self {
            provider,
            environment,
            settings,
            locks: DirectoryLocks::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Strategy `raw` would be resolved with at `tier`.
    pub fn classify(&self, raw: &str, tier: CapabilityTier) -> Result<Strategy, ResolveError> {
        let reference = DocumentReference::parse(raw)?;
        Ok(Strategy::for_reference(&reference, tier))
    }

    /// Resolves `raw` to a local path. The tier is sampled once by the caller.
    pub fn resolve(&self, raw: &str, tier: CapabilityTier) -> Result<ResolvedLocation, ResolveError> {
        let reference = DocumentReference::parse(raw)?;
        let strategy = Strategy::for_reference(&reference, tier);
        let ctx = ResolveContext {
            provider: &self.provider,
            environment: &self.environment,
            settings: &self.settings,
            locks: &self.locks,
        };
        let location = strategy.resolve(&reference, &ctx)?;
        tracing::debug!(
            reference = raw,
            strategy = %strategy,
            kind = location.kind(),
            "resolved"
        );
        Ok(location)
    }

    /// Like [`resolve`](Self::resolve), with every error collapsed to `Unresolved`.
    pub fn resolve_location(&self, raw: &str, tier: CapabilityTier) -> ResolvedLocation {
        self.resolve(raw, tier).unwrap_or_else(|e| {
            tracing::debug!(reference = raw, error = %e, "unresolved");
            ResolvedLocation::Unresolved
        })
    }

    /// Path string or `None`; never fails.
    pub fn resolve_legacy(&self, raw: &str, tier: CapabilityTier) -> Option<String> {
        self.resolve_location(raw, tier).into_legacy()
    }
}
