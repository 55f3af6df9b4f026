//! Reference classification: which provider category services a reference.
//!
//! Classification is a pure function of the reference's authority and
//! scheme. Authorities match exactly (case-sensitive); schemes match
//! case-insensitively.

use crate::reference::DocumentReference;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";
pub const DOWNLOADS_AUTHORITY: &str = "com.android.providers.downloads.documents";
pub const MEDIA_AUTHORITY: &str = "com.android.providers.media.documents";
pub const DRIVE_AUTHORITIES: [&str; 2] = [
    "com.google.android.apps.docs.storage",
    "com.google.android.apps.docs.storage.legacy",
];
pub const WHATSAPP_AUTHORITY: &str = "com.whatsapp.provider.media";
pub const GOOGLE_PHOTOS_AUTHORITY: &str = "com.google.android.apps.photos.content";

/// Platform capability tier, sampled once per resolution.
///
/// Ordered: `Legacy < ModernQueryable < ScopedStorageEnforced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CapabilityTier {
    #[serde(rename = "legacy")]
    Legacy,
    #[serde(rename = "modern")]
    ModernQueryable,
    /// Literal paths are generally not readable; stream-only content is copied.
    #[default]
    #[serde(rename = "scoped")]
    ScopedStorageEnforced,
}

impl CapabilityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTier::Legacy => "legacy",
            CapabilityTier::ModernQueryable => "modern",
            CapabilityTier::ScopedStorageEnforced => "scoped",
        }
    }
}

impl fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CapabilityTier::Legacy),
            "modern" | "modern-queryable" => Ok(CapabilityTier::ModernQueryable),
            "scoped" | "scoped-storage" => Ok(CapabilityTier::ScopedStorageEnforced),
            other => Err(format!(
                "unknown capability tier {other:?} (expected legacy, modern, or scoped)"
            )),
        }
    }
}

/// Backing subsystem that services a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderCategory {
    ExternalStorage,
    Downloads,
    Media,
    Drive,
    WhatsApp,
    GooglePhotos,
    GenericContent,
    FileScheme,
    Unsupported,
}

impl ProviderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderCategory::ExternalStorage => "external-storage",
            ProviderCategory::Downloads => "downloads",
            ProviderCategory::Media => "media",
            ProviderCategory::Drive => "drive",
            ProviderCategory::WhatsApp => "whatsapp",
            ProviderCategory::GooglePhotos => "google-photos",
            ProviderCategory::GenericContent => "generic-content",
            ProviderCategory::FileScheme => "file",
            ProviderCategory::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a reference to its provider category.
pub fn classify(reference: &DocumentReference) -> ProviderCategory {
    classify_parts(reference.scheme(), reference.authority())
}

/// Classification on raw scheme and authority strings.
pub fn classify_parts(scheme: &str, authority: &str) -> ProviderCategory {
    match authority {
        EXTERNAL_STORAGE_AUTHORITY => return ProviderCategory::ExternalStorage,
        DOWNLOADS_AUTHORITY => return ProviderCategory::Downloads,
        MEDIA_AUTHORITY => return ProviderCategory::Media,
        WHATSAPP_AUTHORITY => return ProviderCategory::WhatsApp,
        GOOGLE_PHOTOS_AUTHORITY => return ProviderCategory::GooglePhotos,
        a if DRIVE_AUTHORITIES.contains(&a) => return ProviderCategory::Drive,
        _ => {}
    }
    if scheme.eq_ignore_ascii_case("content") {
        ProviderCategory::GenericContent
    } else if scheme.eq_ignore_ascii_case("file") {
        ProviderCategory::FileScheme
    } else {
        ProviderCategory::Unsupported
    }
}
