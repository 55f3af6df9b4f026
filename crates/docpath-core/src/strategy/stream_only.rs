//! Stream-only providers (Drive, WhatsApp, and generic content).
//!
//! These never expose a literal path, so the bytes are copied into private
//! storage. Generic content is the exception below the scoped-storage tier,
//! where one `_data` lookup on the reference itself is tried instead.

use super::ResolveContext;
use crate::classify::CapabilityTier;
use crate::column_query::{query_column, query_first_row};
use crate::copier::{self, destination_name, CopyJob};
use crate::error::ResolveError;
use crate::location::ResolvedLocation;
use crate::provider::columns;
use crate::reference::DocumentReference;
use std::path::PathBuf;

pub(super) fn resolve_drive(
    reference: &DocumentReference,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let root = ctx.environment.private_storage_root();
    materialize(reference, root, ctx)
}

pub(super) fn resolve_whatsapp(
    reference: &DocumentReference,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let root = ctx
        .environment
        .private_storage_root()
        .join(&ctx.settings.whatsapp_dir);
    materialize(reference, root, ctx)
}

pub(super) fn resolve_generic(
    reference: &DocumentReference,
    tier: CapabilityTier,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    if tier >= CapabilityTier::ScopedStorageEnforced {
        return materialize(reference, ctx.environment.private_storage_root(), ctx);
    }
    query_column(ctx.provider, reference.as_str(), None, &[], columns::DATA)?
        .map(|p| ResolvedLocation::DirectPath(PathBuf::from(p)))
        .ok_or_else(|| ResolveError::not_found(format!("{reference} has no {} column", columns::DATA)))
}

/// Reads name and size metadata, opens the stream, and copies it under `root`.
fn materialize(
    reference: &DocumentReference,
    root: PathBuf,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedLocation, ResolveError> {
    let meta = query_first_row(
        ctx.provider,
        reference.as_str(),
        &[columns::DISPLAY_NAME, columns::SIZE],
        None,
        &[],
    )?;
    let display_name = meta.as_ref().and_then(|r| r.get(columns::DISPLAY_NAME));
    let size = meta
        .as_ref()
        .and_then(|r| r.get(columns::SIZE))
        .and_then(|s| s.trim().parse::<u64>().ok());
    let name = destination_name(display_name, reference.last_path_segment());
    tracing::debug!(reference = %reference, name = %name, size, "materializing stream-only document");

    let source = ctx.provider.open_read(reference.as_str())?.or_available(size);
    let job = CopyJob {
        source,
        destination_root: root,
        display_name: name,
    };
    let path = copier::materialize(job, &ctx.settings.copy, ctx.locks)?;
    Ok(ResolvedLocation::MaterializedCopy(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::external_roots::ExternalRoots;
    use crate::provider::{MemoryProvider, ProviderCall, Row};
    use crate::strategy::test_support::{reference, Harness};
    use std::fs;

    const DRIVE_REF: &str = "content://com.google.android.apps.docs.storage/document/acc%3D1%3Bdoc%3D42";
    const WHATSAPP_REF: &str = "content://com.whatsapp.provider.media/item/9f1c";
    const GENERIC_REF: &str = "content://org.example.files/shared/77";

    #[test]
    fn drive_copies_into_private_root() {
        let private = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new()
            .with_rows(
                DRIVE_REF,
                vec![Row::new()
                    .with(columns::DISPLAY_NAME, "notes.txt")
                    .with(columns::SIZE, "5")],
            )
            .with_bytes(DRIVE_REF, b"hello".to_vec());
        let h = Harness::new(provider, private.path(), ExternalRoots::default());

        let got = resolve_drive(&reference(DRIVE_REF), &h.ctx()).unwrap();
        let expected = private.path().join("notes.txt");
        assert_eq!(got, ResolvedLocation::MaterializedCopy(expected.clone()));
        assert_eq!(fs::read(expected).unwrap(), b"hello");
        assert!(!h.provider.queried_column(columns::DATA));
    }

    #[test]
    fn whatsapp_copies_into_dedicated_subdirectory() {
        let private = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new()
            .with_rows(WHATSAPP_REF, vec![Row::new().with(columns::DISPLAY_NAME, "IMG-0001.jpg")])
            .with_bytes(WHATSAPP_REF, vec![0xFFu8, 0xD8, 0xFF]);
        let h = Harness::new(provider, private.path(), ExternalRoots::default());

        let got = resolve_whatsapp(&reference(WHATSAPP_REF), &h.ctx()).unwrap();
        let expected = private.path().join("whatsapp").join("IMG-0001.jpg");
        assert_eq!(got, ResolvedLocation::MaterializedCopy(expected.clone()));
        assert_eq!(fs::read(expected).unwrap(), vec![0xFFu8, 0xD8, 0xFF]);
        assert_eq!(
            h.provider.journal()[1],
            ProviderCall::Open {
                target: WHATSAPP_REF.into()
            }
        );
    }

    #[test]
    fn missing_metadata_falls_back_to_last_segment() {
        let private = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new().with_bytes(WHATSAPP_REF, b"x".to_vec());
        let h = Harness::new(provider, private.path(), ExternalRoots::default());
        let got = resolve_whatsapp(&reference(WHATSAPP_REF), &h.ctx()).unwrap();
        assert_eq!(
            got,
            ResolvedLocation::MaterializedCopy(private.path().join("whatsapp").join("9f1c"))
        );
    }

    #[test]
    fn generic_scoped_materializes() {
        let private = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new()
            .with_rows(GENERIC_REF, vec![Row::new().with(columns::DISPLAY_NAME, "a.srt")])
            .with_bytes(GENERIC_REF, b"1\n00:00:01,000 --> 00:00:02,000\nhi\n".to_vec());
        let h = Harness::new(provider, private.path(), ExternalRoots::default());
        let got = resolve_generic(&reference(GENERIC_REF), CapabilityTier::ScopedStorageEnforced, &h.ctx())
            .unwrap();
        assert_eq!(got, ResolvedLocation::MaterializedCopy(private.path().join("a.srt")));
    }

    #[test]
    fn generic_below_scoped_queries_data_column_once() {
        let private = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new().with_rows(
            GENERIC_REF,
            vec![Row::new().with(columns::DATA, "/storage/emulated/0/Subs/a.srt")],
        );
        let h = Harness::new(provider, private.path(), ExternalRoots::default());
        let got = resolve_generic(&reference(GENERIC_REF), CapabilityTier::ModernQueryable, &h.ctx())
            .unwrap();
        assert_eq!(
            got,
            ResolvedLocation::DirectPath("/storage/emulated/0/Subs/a.srt".into())
        );
        assert_eq!(h.provider.query_count(), 1);
    }

    #[test]
    fn open_failure_is_reported() {
        let private = tempfile::tempdir().unwrap();
        let h = Harness::new(MemoryProvider::new(), private.path(), ExternalRoots::default());
        let err = resolve_drive(&reference(DRIVE_REF), &h.ctx()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(fs::read_dir(private.path()).unwrap().count(), 0);
    }
}
