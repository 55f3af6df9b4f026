//! Collaborator interfaces the resolver consumes.
//!
//! The resolver never talks to a platform directly. Row lookups and byte
//! streams come from a `ContentProvider`; storage roots come from a
//! `StorageEnvironment`. Both are narrow and read-only.

mod environment;
mod memory;

pub use environment::StaticEnvironment;
pub use memory::{MemoryProvider, ProviderCall};

use crate::error::ProviderError;
use crate::external_roots::ExternalRoots;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;

/// Well-known column names.
pub mod columns {
    /// Legacy absolute-path column.
    pub const DATA: &str = "_data";
    pub const DISPLAY_NAME: &str = "_display_name";
    pub const SIZE: &str = "_size";
    pub const ID: &str = "_id";
}

/// One result row: column name to (nullable) string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: BTreeMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a non-null value.
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.values.insert(column.to_string(), Some(value.into()));
        self
    }

    /// Builder-style insert of a SQL-null value.
    pub fn with_null(mut self, column: &str) -> Self {
        self.values.insert(column.to_string(), None);
        self
    }

    /// Value of `column`; `None` when the column is absent or null.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|v| v.as_deref())
    }

    /// Keeps only the given columns (a query projection). Empty keeps all.
    pub fn project(&self, columns: &[&str]) -> Row {
        if columns.is_empty() {
            return self.clone();
        }
        Row {
            values: self
                .values
                .iter()
                .filter(|(k, _)| columns.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Sequential read access to a provider's bytes, plus the number of bytes
/// the provider reports as immediately available.
pub struct ContentStream {
    reader: Box<dyn Read + Send>,
    available: u64,
}

impl ContentStream {
    pub fn new(reader: Box<dyn Read + Send>, available: u64) -> Self {
        Self { reader, available }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let available = bytes.len() as u64;
        Self::new(Box::new(io::Cursor::new(bytes)), available)
    }

    /// Availability hint used to size the copy buffer. Zero means unknown.
    pub fn available(&self) -> u64 {
        self.available
    }

    /// Replaces an unknown (zero) availability hint with `hint`.
    pub fn or_available(mut self, hint: Option<u64>) -> Self {
        if self.available == 0 {
            self.available = hint.unwrap_or(0);
        }
        self
    }
}

impl Read for ContentStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStream")
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

/// Row lookup and stream access against content authorities.
pub trait ContentProvider {
    /// Runs a query against `target`, returning matching rows projected to
    /// `columns` (all columns when empty).
    fn query(
        &self,
        target: &str,
        columns: &[&str],
        selection: Option<&str>,
        args: &[&str],
    ) -> Result<Vec<Row>, ProviderError>;

    /// Opens `target` for sequential reading.
    fn open_read(&self, target: &str) -> Result<ContentStream, ProviderError>;
}

impl<T: ContentProvider + ?Sized> ContentProvider for &T {
    fn query(
        &self,
        target: &str,
        columns: &[&str],
        selection: Option<&str>,
        args: &[&str],
    ) -> Result<Vec<Row>, ProviderError> {
        (**self).query(target, columns, selection, args)
    }

    fn open_read(&self, target: &str) -> Result<ContentStream, ProviderError> {
        (**self).open_read(target)
    }
}

/// Where the app may write, and which shared storage roots are declared.
pub trait StorageEnvironment {
    /// App-private write root; materialized copies land under it.
    fn private_storage_root(&self) -> PathBuf;

    fn external_roots(&self) -> ExternalRoots;
}

impl<T: StorageEnvironment + ?Sized> StorageEnvironment for &T {
    fn private_storage_root(&self) -> PathBuf {
        (**self).private_storage_root()
    }

    fn external_roots(&self) -> ExternalRoots {
        (**self).external_roots()
    }
}
