//! Strategies answered from the reference alone, with no provider access.

use crate::error::ResolveError;
use crate::location::ResolvedLocation;
use crate::reference::DocumentReference;
use std::path::PathBuf;

/// `file:` references: the decoded path, unchanged.
pub(super) fn resolve_file(reference: &DocumentReference) -> Result<ResolvedLocation, ResolveError> {
    let path = reference.raw_path();
    if path.is_empty() {
        return Err(ResolveError::malformed(format!("{reference} has an empty path")));
    }
    Ok(ResolvedLocation::DirectPath(PathBuf::from(path)))
}

/// Google Photos references carry the path as their last segment.
pub(super) fn resolve_google_photos(
    reference: &DocumentReference,
) -> Result<ResolvedLocation, ResolveError> {
    reference
        .last_path_segment()
        .map(|s| ResolvedLocation::DirectPath(PathBuf::from(s)))
        .ok_or_else(|| ResolveError::not_found(format!("{reference} has no path segment")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::strategy::test_support::reference;

    #[test]
    fn file_path_unchanged() {
        let r = reference("file:///storage/emulated/0/Download/show.mkv");
        assert_eq!(
            resolve_file(&r).unwrap(),
            ResolvedLocation::DirectPath("/storage/emulated/0/Download/show.mkv".into())
        );
    }

    #[test]
    fn google_photos_last_segment() {
        let r = reference(
            "content://com.google.android.apps.photos.content/0/1/mediakey%3A%2Flocal%253A1/ORIGINAL/NONE/%2Fstorage%2Femulated%2F0%2FDCIM%2Fa.jpg",
        );
        assert_eq!(
            resolve_google_photos(&r).unwrap(),
            ResolvedLocation::DirectPath("/storage/emulated/0/DCIM/a.jpg".into())
        );
    }

    #[test]
    fn google_photos_without_segments() {
        let r = reference("content://com.google.android.apps.photos.content/");
        assert_eq!(resolve_google_photos(&r).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
