//! External-storage documents: `<volume>:<relative path>` ids.
//!
//! `primary` maps onto the primary root. Other volume ids (device-specific
//! identifiers like `71F8-2C0A`) have no known root mapping, so the declared
//! secondary and external roots are probed in that order.

use super::ResolveContext;
use crate::error::ResolveError;
use crate::external_roots::{join_relative, probe_relative, Probe};
use crate::location::ResolvedLocation;
use crate::reference::{split_document_id, DocumentReference};

const PRIMARY_VOLUME: &str = "primary";

/// Best effort: when nothing exists, the last constructed candidate is
/// returned rather than an error. For the primary volume that candidate is
/// the primary-root path.
pub(super) fn resolve(
    reference: &DocumentReference,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let id = reference.require_document_id()?;
    let (volume, relative) = split_document_id(id)?;
    let roots = ctx.environment.external_roots();

    let primary_candidate = if volume.eq_ignore_ascii_case(PRIMARY_VOLUME) {
        roots.primary.as_deref().map(|root| join_relative(root, relative))
    } else {
        None
    };
    if let Some(candidate) = &primary_candidate {
        if candidate.exists() {
            return Ok(ResolvedLocation::DirectPath(candidate.clone()));
        }
    }

    let probed = probe_relative(&roots.fallback_roots(), relative);
    let path = match (probed, primary_candidate) {
        (Probe::Found(p), _) => p,
        (_, Some(primary)) => primary,
        (probe, None) => probe.best_effort().ok_or_else(|| {
            ResolveError::not_found(format!("no storage root declared for volume {volume:?}"))
        })?,
    };
    tracing::debug!(volume, path = %path.display(), exists = path.exists(), "external storage candidate");
    Ok(ResolvedLocation::DirectPath(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::external_roots::ExternalRoots;
    use crate::provider::MemoryProvider;
    use crate::strategy::test_support::{reference, Harness};
    use std::fs;
    use std::path::Path;

    fn roots(primary: Option<&Path>, secondary: Option<&Path>, external: Option<&Path>) -> ExternalRoots {
        ExternalRoots {
            primary: primary.map(Path::to_path_buf),
            secondary: secondary.map(Path::to_path_buf),
            external: external.map(Path::to_path_buf),
        }
    }

    const PRIMARY_REF: &str =
        "content://com.android.externalstorage.documents/document/primary%3APictures%2Fa.jpg";

    #[test]
    fn primary_existing_file() {
        let private = tempfile::tempdir().unwrap();
        let primary = tempfile::tempdir().unwrap();
        fs::create_dir_all(primary.path().join("Pictures")).unwrap();
        fs::write(primary.path().join("Pictures/a.jpg"), b"jpg").unwrap();

        let h = Harness::new(MemoryProvider::new(), private.path(), roots(Some(primary.path()), None, None));
        let got = resolve(&reference(PRIMARY_REF), &h.ctx()).unwrap();
        assert_eq!(got, ResolvedLocation::DirectPath(primary.path().join("Pictures/a.jpg")));
    }

    #[test]
    fn primary_missing_file_returns_constructed_path() {
        let private = tempfile::tempdir().unwrap();
        let primary = tempfile::tempdir().unwrap();
        let external = tempfile::tempdir().unwrap();

        let h = Harness::new(
            MemoryProvider::new(),
            private.path(),
            roots(Some(primary.path()), None, Some(external.path())),
        );
        let got = resolve(&reference(PRIMARY_REF), &h.ctx()).unwrap();
        let expected = primary.path().join("Pictures/a.jpg");
        assert!(!expected.exists());
        assert_eq!(got, ResolvedLocation::DirectPath(expected));
    }

    #[test]
    fn primary_missing_but_present_on_secondary() {
        let private = tempfile::tempdir().unwrap();
        let primary = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        fs::create_dir_all(secondary.path().join("Pictures")).unwrap();
        fs::write(secondary.path().join("Pictures/a.jpg"), b"jpg").unwrap();

        let h = Harness::new(
            MemoryProvider::new(),
            private.path(),
            roots(Some(primary.path()), Some(secondary.path()), None),
        );
        let got = resolve(&reference(PRIMARY_REF), &h.ctx()).unwrap();
        assert_eq!(got, ResolvedLocation::DirectPath(secondary.path().join("Pictures/a.jpg")));
    }

    #[test]
    fn removable_volume_probes_secondary_then_external() {
        let private = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        let external = tempfile::tempdir().unwrap();
        fs::create_dir_all(external.path().join("Music")).unwrap();
        fs::write(external.path().join("Music/b.mp3"), b"mp3").unwrap();

        let h = Harness::new(
            MemoryProvider::new(),
            private.path(),
            roots(None, Some(secondary.path()), Some(external.path())),
        );
        let r = reference("content://com.android.externalstorage.documents/document/71F8-2C0A%3AMusic%2Fb.mp3");
        assert_eq!(
            resolve(&r, &h.ctx()).unwrap(),
            ResolvedLocation::DirectPath(external.path().join("Music/b.mp3"))
        );
    }

    #[test]
    fn removable_volume_nothing_exists_returns_last_candidate() {
        let private = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        let external = tempfile::tempdir().unwrap();

        let h = Harness::new(
            MemoryProvider::new(),
            private.path(),
            roots(None, Some(secondary.path()), Some(external.path())),
        );
        let r = reference("content://com.android.externalstorage.documents/document/71F8-2C0A%3AMusic%2Fb.mp3");
        assert_eq!(
            resolve(&r, &h.ctx()).unwrap(),
            ResolvedLocation::DirectPath(external.path().join("Music/b.mp3"))
        );
    }

    #[test]
    fn no_roots_declared_is_not_found() {
        let private = tempfile::tempdir().unwrap();
        let h = Harness::new(MemoryProvider::new(), private.path(), ExternalRoots::default());
        let r = reference("content://com.android.externalstorage.documents/document/71F8-2C0A%3Ab.mp3");
        assert_eq!(resolve(&r, &h.ctx()).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn id_without_separator_is_malformed() {
        let private = tempfile::tempdir().unwrap();
        let h = Harness::new(MemoryProvider::new(), private.path(), ExternalRoots::default());
        let r = reference("content://com.android.externalstorage.documents/document/primary");
        assert_eq!(resolve(&r, &h.ctx()).unwrap_err().kind(), ErrorKind::Malformed);
    }

    #[test]
    fn never_touches_the_provider() {
        let private = tempfile::tempdir().unwrap();
        let primary = tempfile::tempdir().unwrap();
        let h = Harness::new(MemoryProvider::new(), private.path(), roots(Some(primary.path()), None, None));
        resolve(&reference(PRIMARY_REF), &h.ctx()).unwrap();
        assert!(h.provider.journal().is_empty());
    }
}
