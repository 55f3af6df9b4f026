//! Media provider documents: `<image|video|audio>:<row id>` ids.

use super::ResolveContext;
use crate::column_query::query_column;
use crate::error::ResolveError;
use crate::location::ResolvedLocation;
use crate::provider::columns;
use crate::reference::{split_document_id, DocumentReference};
use std::path::PathBuf;

pub const IMAGE_COLLECTION: &str = "content://media/external/images/media";
pub const VIDEO_COLLECTION: &str = "content://media/external/video/media";
pub const AUDIO_COLLECTION: &str = "content://media/external/audio/media";

const ROW_ID_SELECTION: &str = "_id=?";

fn collection_for(media_type: &str) -> Option<&'static str> {
    match media_type {
        "image" => Some(IMAGE_COLLECTION),
        "video" => Some(VIDEO_COLLECTION),
        "audio" => Some(AUDIO_COLLECTION),
        _ => None,
    }
}

pub(super) fn resolve(
    reference: &DocumentReference,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let id = reference.require_document_id()?;
    let (media_type, row_id) = split_document_id(id)?;
    let collection = collection_for(media_type)
        .ok_or_else(|| ResolveError::Unsupported(format!("media type {media_type:?}")))?;

    query_column(
        ctx.provider,
        collection,
        Some(ROW_ID_SELECTION),
        &[row_id],
        columns::DATA,
    )?
    .map(|p| ResolvedLocation::DirectPath(PathBuf::from(p)))
    .ok_or_else(|| ResolveError::not_found(format!("{media_type} {row_id} not in {collection}")))
}
