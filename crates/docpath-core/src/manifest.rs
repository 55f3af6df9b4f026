//! Provider manifests: a TOML description of provider rows, byte streams and
//! storage roots, used to drive resolution outside a device.
//!
//! ```toml
//! failing = ["content://org.example.locked/doc/1"]
//!
//! [roots]
//! private = "private"              # relative to the manifest's directory
//! primary = "/storage/emulated/0"
//!
//! [[rows]]
//! target = "content://media/external/video/media"
//! selection = "_id=?"
//! args = ["57"]
//! columns = { _data = "/storage/emulated/0/Movies/ep3.mp4" }
//!
//! [[streams]]
//! target = "content://com.whatsapp.provider.media/item/1"
//! file = "fixtures/voice.opus"
//! ```

use crate::external_roots::ExternalRoots;
use crate::provider::{MemoryProvider, Row, StaticEnvironment};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestRoots {
    /// Private root for materialized copies.
    #[serde(default)]
    pub private: Option<PathBuf>,
    #[serde(default)]
    pub primary: Option<PathBuf>,
    #[serde(default)]
    pub secondary: Option<PathBuf>,
    #[serde(default)]
    pub external: Option<PathBuf>,
}

/// One row returned for a `(target, selection, args)` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRow {
    pub target: String,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

/// Bytes served for `target`, from a file or inline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStream {
    pub target: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Targets whose queries and opens fail.
    #[serde(default)]
    pub failing: Vec<String>,
    #[serde(default)]
    pub roots: ManifestRoots,
    #[serde(default)]
    pub rows: Vec<ManifestRow>,
    #[serde(default)]
    pub streams: Vec<ManifestStream>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Manifest {
    /// Reads `path`; relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let mut manifest = Self::from_toml_str(&data)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(data)?;
        for stream in &manifest.streams {
            match (&stream.file, &stream.text) {
                (Some(_), Some(_)) => bail!("stream {} has both file and text", stream.target),
                (None, None) => bail!("stream {} has neither file nor text", stream.target),
                _ => {}
            }
        }
        Ok(manifest)
    }

    fn absolute(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn provider(&self) -> MemoryProvider {
        let mut provider = MemoryProvider::new();
        for row in &self.rows {
            let args: Vec<&str> = row.args.iter().map(String::as_str).collect();
            let built = row
                .columns
                .iter()
                .fold(Row::new(), |r, (column, value)| r.with(column, value.as_str()));
            provider.add_rows(&row.target, row.selection.as_deref(), &args, vec![built]);
        }
        for stream in &self.streams {
            match (&stream.file, &stream.text) {
                (Some(file), _) => provider.add_file(&stream.target, self.absolute(file)),
                (None, Some(text)) => provider.add_bytes(&stream.target, text.clone().into_bytes()),
                (None, None) => {}
            }
        }
        for target in &self.failing {
            provider.add_failure(target);
        }
        provider
    }

    /// Declared roots; without a private root, `fallback_private` is used.
    pub fn environment(&self, fallback_private: &Path) -> StaticEnvironment {
        let r = &self.roots;
        let private = r
            .private
            .as_deref()
            .map(|p| self.absolute(p))
            .unwrap_or_else(|| fallback_private.to_path_buf());
        StaticEnvironment::new(
            private,
            ExternalRoots {
                primary: r.primary.as_deref().map(|p| self.absolute(p)),
                secondary: r.secondary.as_deref().map(|p| self.absolute(p)),
                external: r.external.as_deref().map(|p| self.absolute(p)),
            },
        )
    }

    /// Whether the manifest declares any storage root besides the private one.
    pub fn declares_roots(&self) -> bool {
        let r = &self.roots;
        r.primary.is_some() || r.secondary.is_some() || r.external.is_some()
    }
}
