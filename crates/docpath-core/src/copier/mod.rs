//! Materializing copier: streams provider bytes into app-private storage.
//!
//! Bytes go to `<destination>.part` first and are renamed onto the
//! destination once the source is exhausted, so the destination only ever
//! holds a complete copy. A failed copy removes the partial file and reports
//! `CopyFailed`. Copies into the same directory are serialized.

mod lock;
mod name;

pub use lock::{DirectoryGuard, DirectoryLocks};
pub use name::{destination_name, sanitize_display_name, DEFAULT_NAME, MAX_NAME_BYTES};

use crate::error::ResolveError;
use crate::provider::ContentStream;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of the staging file written before the final rename.
pub const STAGING_SUFFIX: &str = ".part";

/// Buffer sizing for stream copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySettings {
    /// Upper bound on the copy buffer.
    pub max_buffer_bytes: usize,
    /// Lower bound, used when the source reports little or nothing available.
    pub min_buffer_bytes: usize,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            max_buffer_bytes: 1024 * 1024,
            min_buffer_bytes: 8 * 1024,
        }
    }
}

impl CopySettings {
    /// `min(available, max)`, raised to the floor.
    pub fn buffer_size(&self, available: u64) -> usize {
        let hint = usize::try_from(available).unwrap_or(usize::MAX);
        let floor = self.min_buffer_bytes.clamp(1, self.max_buffer_bytes.max(1));
        hint.min(self.max_buffer_bytes).max(floor)
    }
}

/// One materialization: a source stream, where to put it, and under what name.
#[derive(Debug)]
pub struct CopyJob {
    pub source: ContentStream,
    pub destination_root: PathBuf,
    /// Already-sanitized file name.
    pub display_name: String,
}

/// Path of the staging file for `destination` (`a.pdf` → `a.pdf.part`).
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut o = destination.as_os_str().to_owned();
    o.push(STAGING_SUFFIX);
    PathBuf::from(o)
}

/// Copies `job.source` to `job.destination_root/job.display_name`.
///
/// Creates the root if absent and overwrites an existing file of the same
/// name. Returns the destination path.
pub fn materialize(
    job: CopyJob,
    settings: &CopySettings,
    locks: &DirectoryLocks,
) -> Result<PathBuf, ResolveError> {
    let CopyJob {
        mut source,
        destination_root,
        display_name,
    } = job;

    fs::create_dir_all(&destination_root).map_err(|e| ResolveError::CopyFailed {
        path: destination_root.clone(),
        source: e,
    })?;
    let destination = destination_root.join(&display_name);
    let staging = staging_path(&destination);
    let buffer_size = settings.buffer_size(source.available());

    let _guard = locks.lock(&destination_root);
    let copied = copy_stream(&mut source, &staging, buffer_size)
        .and_then(|n| fs::rename(&staging, &destination).map(|()| n));

    match copied {
        Ok(bytes) => {
            tracing::info!(
                path = %destination.display(),
                bytes,
                buffer_size,
                "materialized copy"
            );
            Ok(destination)
        }
        Err(e) => {
            tracing::warn!(path = %destination.display(), error = %e, "materialization failed");
            if let Err(rm) = fs::remove_file(&staging) {
                if rm.kind() != io::ErrorKind::NotFound {
                    tracing::debug!(path = %staging.display(), error = %rm, "failed to remove staging file");
                }
            }
            Err(ResolveError::CopyFailed {
                path: destination,
                source: e,
            })
        }
    }
}

/// Streams `source` into a fresh file at `path` until EOF. Returns bytes written.
fn copy_stream<R: Read>(source: &mut R, path: &Path, buffer_size: usize) -> io::Result<u64> {
    let mut out = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut buf = vec![0u8; buffer_size];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.flush()?;
    out.sync_all()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::provider::{ContentProvider, MemoryProvider};

    fn job(source: ContentStream, root: &Path, name: &str) -> CopyJob {
        CopyJob {
            source,
            destination_root: root.to_path_buf(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn buffer_size_is_bounded() {
        let s = CopySettings::default();
        assert_eq!(s.buffer_size(0), 8 * 1024);
        assert_eq!(s.buffer_size(100_000), 100_000);
        assert_eq!(s.buffer_size(50 * 1024 * 1024), 1024 * 1024);
        assert_eq!(s.buffer_size(u64::MAX), 1024 * 1024);
    }

    #[test]
    fn buffer_floor_never_exceeds_ceiling() {
        let s = CopySettings {
            max_buffer_bytes: 4096,
            min_buffer_bytes: 65536,
        };
        assert_eq!(s.buffer_size(0), 4096);
    }

    #[test]
    fn staging_path_appends_part() {
        assert_eq!(
            staging_path(Path::new("/data/files/a.pdf")),
            PathBuf::from("/data/files/a.pdf.part")
        );
    }

    #[test]
    fn creates_root_and_copies() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("whatsapp");
        let locks = DirectoryLocks::new();
        let path = materialize(
            job(ContentStream::from_bytes(b"voice note".to_vec()), &root, "note.opus"),
            &CopySettings::default(),
            &locks,
        )
        .unwrap();
        assert_eq!(path, root.join("note.opus"));
        assert_eq!(fs::read(&path).unwrap(), b"voice note");
        assert!(!staging_path(&path).exists());
        assert_eq!(locks.held_count(), 0);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"old contents that are longer").unwrap();
        let path = materialize(
            job(ContentStream::from_bytes(b"new".to_vec()), dir.path(), "a.txt"),
            &CopySettings::default(),
            &DirectoryLocks::new(),
        )
        .unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn failed_copy_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MemoryProvider::new().with_broken_stream("content://x/1", vec![7u8; 4096]);
        let stream = provider.open_read("content://x/1").unwrap();
        let locks = DirectoryLocks::new();
        let err = materialize(
            job(stream, dir.path(), "clip.mp4"),
            &CopySettings::default(),
            &locks,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        match err {
            ResolveError::CopyFailed { path, .. } => assert_eq!(path, dir.path().join("clip.mp4")),
            other => panic!("expected CopyFailed, got {other:?}"),
        }
        assert!(!dir.path().join("clip.mp4").exists());
        assert!(!dir.path().join("clip.mp4.part").exists());
        assert_eq!(locks.held_count(), 0);
    }
}
