use crate::classify::CapabilityTier;
use crate::copier::CopySettings;
use crate::external_roots::ExternalRoots;
use crate::provider::StaticEnvironment;
use crate::resolver::ResolverSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Copy buffer bounds (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Largest copy buffer in bytes.
    pub max_buffer_bytes: usize,
    /// Smallest copy buffer in bytes, used when the source reports nothing available.
    pub min_buffer_bytes: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        let d = CopySettings::default();
        Self {
            max_buffer_bytes: d.max_buffer_bytes,
            min_buffer_bytes: d.min_buffer_bytes,
        }
    }
}

/// Global configuration loaded from `~/.config/docpath/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocpathConfig {
    /// Capability tier used when the caller does not pass one: "legacy", "modern" or "scoped".
    #[serde(default)]
    pub tier: CapabilityTier,
    /// App-private directory receiving materialized copies. Defaults to the XDG data dir.
    #[serde(default)]
    pub private_root: Option<PathBuf>,
    /// Storage root overrides; undeclared roots fall back to SECONDARY_STORAGE / EXTERNAL_STORAGE.
    #[serde(default)]
    pub roots: ExternalRoots,
    /// Directory under the primary root holding downloads.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,
    /// Private subdirectory for WhatsApp copies.
    #[serde(default = "default_whatsapp_dir")]
    pub whatsapp_dir: String,
    #[serde(default)]
    pub copy: CopyConfig,
}

fn default_downloads_dir() -> String {
    ResolverSettings::default().downloads_dir
}

fn default_whatsapp_dir() -> String {
    ResolverSettings::default().whatsapp_dir
}

impl Default for DocpathConfig {
    fn default() -> Self {
        Self {
            tier: CapabilityTier::default(),
            private_root: None,
            roots: ExternalRoots::default(),
            downloads_dir: default_downloads_dir(),
            whatsapp_dir: default_whatsapp_dir(),
            copy: CopyConfig::default(),
        }
    }
}

impl DocpathConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            downloads_dir: self.downloads_dir.clone(),
            whatsapp_dir: self.whatsapp_dir.clone(),
            copy: CopySettings {
                max_buffer_bytes: self.copy.max_buffer_bytes,
                min_buffer_bytes: self.copy.min_buffer_bytes,
            },
        }
    }

    /// Configured private root, or `$XDG_DATA_HOME/docpath/private`.
    pub fn private_root(&self) -> Result<PathBuf> {
        match &self.private_root {
            Some(p) => Ok(p.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix("docpath")?;
                Ok(xdg_dirs.get_data_home().join("docpath").join("private"))
            }
        }
    }

    /// Configured roots, with undeclared secondary/external roots taken from the environment.
    pub fn external_roots(&self) -> ExternalRoots {
        self.roots.clone().or(ExternalRoots::from_env(None))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn environment(&self) -> Result<StaticEnvironment> {
        Ok(StaticEnvironment::new(self.private_root()?, self.external_roots()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docpath")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DocpathConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DocpathConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DocpathConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}
