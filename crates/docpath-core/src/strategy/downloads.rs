//! Downloads provider documents.
//!
//! Steps, in order, each short-circuiting:
//! 1. (modern tiers) the display name under the public downloads root
//! 2. `raw:`-prefixed ids carry the path verbatim
//! 3. numeric ids are looked up in the download content roots
//! 4. non-numeric ids: strip raw markers from the path (modern tiers), or
//!    one `_data` lookup on the reference itself (legacy)

use super::ResolveContext;
use crate::classify::CapabilityTier;
use crate::column_query::{query_column, query_first_row};
use crate::error::ResolveError;
use crate::external_roots::join_relative;
use crate::location::ResolvedLocation;
use crate::provider::columns;
use crate::reference::DocumentReference;
use std::path::PathBuf;

/// Marker for ids that are already absolute paths.
pub const RAW_PREFIX: &str = "raw:";
pub const PUBLIC_DOWNLOADS_ROOT: &str = "content://downloads/public_downloads";
pub const MY_DOWNLOADS_ROOT: &str = "content://downloads/my_downloads";

const RAW_DOCUMENT_PREFIX: &str = "/document/raw:";

pub(super) fn resolve(
    reference: &DocumentReference,
    tier: CapabilityTier,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let modern = tier >= CapabilityTier::ModernQueryable;

    if modern {
        if let Some(path) = display_name_candidate(reference, ctx)? {
            tracing::debug!(path = %path.display(), "downloads: resolved by display name");
            return Ok(ResolvedLocation::DirectPath(path));
        }
    }

    let id = reference.require_document_id()?;
    if let Some(raw) = id.strip_prefix(RAW_PREFIX) {
        return Ok(ResolvedLocation::DirectPath(PathBuf::from(raw)));
    }

    let content_roots: &[&str] = if modern {
        &[PUBLIC_DOWNLOADS_ROOT, MY_DOWNLOADS_ROOT]
    } else {
        &[PUBLIC_DOWNLOADS_ROOT]
    };

    match id.parse::<i64>() {
        Ok(row_id) => {
            for root in content_roots {
                let target = format!("{root}/{row_id}");
                if let Some(path) = query_column(ctx.provider, &target, None, &[], columns::DATA)? {
                    return Ok(ResolvedLocation::DirectPath(PathBuf::from(path)));
                }
            }
            Err(ResolveError::not_found(format!("download {row_id} has no path")))
        }
        Err(_) if modern => {
            let path = strip_raw_markers(reference.raw_path());
            tracing::debug!(id, path, "downloads: non-numeric id, using path segment");
            Ok(ResolvedLocation::DirectPath(PathBuf::from(path)))
        }
        Err(_) => query_column(ctx.provider, reference.as_str(), None, &[], columns::DATA)?
            .map(|p| ResolvedLocation::DirectPath(PathBuf::from(p)))
            .ok_or_else(|| ResolveError::not_found(format!("download {id:?} has no path"))),
    }
}

/// `<primary>/<downloads dir>/<display name>` when the provider reports a non-empty name.
fn display_name_candidate(
    reference: &DocumentReference,
    ctx: &ResolveContext<'_>,
) -> Result<Option<PathBuf>, ResolveError> {
    let Some(primary) = ctx.environment.external_roots().primary else {
        return Ok(None);
    };
    let row = query_first_row(ctx.provider, reference.as_str(), &[columns::DISPLAY_NAME], None, &[])?;
    let name = row
        .as_ref()
        .and_then(|r| r.get(columns::DISPLAY_NAME))
        .filter(|n| !n.is_empty());
    Ok(name.map(|n| join_relative(&primary.join(&ctx.settings.downloads_dir), n)))
}

fn strip_raw_markers(path: &str) -> &str {
    let path = path.strip_prefix(RAW_DOCUMENT_PREFIX).unwrap_or(path);
    path.strip_prefix(RAW_PREFIX).unwrap_or(path)
}
