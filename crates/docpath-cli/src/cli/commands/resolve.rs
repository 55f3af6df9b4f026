//! `docpath resolve` – resolve a reference through a manifest-backed provider.

use anyhow::{Context, Result};
use docpath_core::config::DocpathConfig;
use docpath_core::manifest::Manifest;
use docpath_core::provider::{MemoryProvider, StaticEnvironment};
use docpath_core::{CapabilityTier, ResolvedLocation, Resolver};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub uri: String,
    pub manifest: Option<PathBuf>,
    pub tier: CapabilityTier,
    pub legacy: bool,
}

/// Provider and environment for one invocation. Without a manifest the
/// provider is empty, which still serves file, external-storage and
/// Google Photos references.
fn collaborators(
    cfg: &DocpathConfig,
    manifest: Option<&PathBuf>,
) -> Result<(MemoryProvider, StaticEnvironment)> {
    let private_root = cfg.private_root()?;
    let Some(path) = manifest else {
        return Ok((
            MemoryProvider::new(),
            StaticEnvironment::new(private_root, cfg.external_roots()),
        ));
    };
    let manifest = Manifest::load(path)?;
    let mut environment = manifest.environment(&private_root);
    if !manifest.declares_roots() {
        environment.roots = cfg.external_roots();
    }
    Ok((manifest.provider(), environment))
}

pub fn run_resolve(cfg: &DocpathConfig, args: &ResolveArgs, out: &mut impl Write) -> Result<()> {
    let (provider, environment) = collaborators(cfg, args.manifest.as_ref())?;
    let resolver = Resolver::with_settings(provider, environment, cfg.resolver_settings());

    if args.legacy {
        let path = resolver.resolve_legacy(&args.uri, args.tier);
        writeln!(out, "{}", path.as_deref().unwrap_or("null"))?;
        return Ok(());
    }

    let location = resolver
        .resolve(&args.uri, args.tier)
        .with_context(|| format!("resolving {} ({})", args.uri, args.tier))?;
    match &location {
        ResolvedLocation::DirectPath(p) | ResolvedLocation::MaterializedCopy(p) => {
            writeln!(out, "{}\t{}", location.kind(), p.display())?;
        }
        ResolvedLocation::Unresolved => writeln!(out, "unresolved")?,
    }
    Ok(())
}
