//! In-memory content provider with a call journal.
//!
//! Rows are keyed by `(target, selection, args)`; byte sources by target.
//! Every query and open is recorded so callers can see exactly which
//! provider accesses a resolution performed.

use super::{ContentProvider, ContentStream, Row};
use crate::error::ProviderError;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// One recorded provider access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Query {
        target: String,
        columns: Vec<String>,
        selection: Option<String>,
        args: Vec<String>,
    },
    Open {
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    target: String,
    selection: Option<String>,
    args: Vec<String>,
}

impl QueryKey {
    fn new(target: &str, selection: Option<&str>, args: &[&str]) -> Self {
        Self {
            target: target.to_string(),
            selection: selection.map(str::to_string),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Bytes(Vec<u8>),
    File(PathBuf),
    /// Yields `prefix`, then fails with an I/O error.
    Broken(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct MemoryProvider {
    rows: HashMap<QueryKey, Vec<Row>>,
    sources: HashMap<String, Source>,
    failing: HashSet<String>,
    journal: Mutex<Vec<ProviderCall>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rows(&mut self, target: &str, selection: Option<&str>, args: &[&str], rows: Vec<Row>) {
        self.rows
            .entry(QueryKey::new(target, selection, args))
            .or_default()
            .extend(rows);
    }

    pub fn add_bytes(&mut self, target: &str, bytes: Vec<u8>) {
        self.sources.insert(target.to_string(), Source::Bytes(bytes));
    }

    pub fn add_file(&mut self, target: &str, path: impl Into<PathBuf>) {
        self.sources.insert(target.to_string(), Source::File(path.into()));
    }

    /// Every query and open against `target` fails.
    pub fn add_failure(&mut self, target: &str) {
        self.failing.insert(target.to_string());
    }

    /// Rows returned for an unfiltered query on `target`.
    pub fn with_rows(mut self, target: &str, rows: Vec<Row>) -> Self {
        self.add_rows(target, None, &[], rows);
        self
    }

    /// Rows returned for a query on `target` with exactly this selection and args.
    pub fn with_selected_rows(
        mut self,
        target: &str,
        selection: &str,
        args: &[&str],
        rows: Vec<Row>,
    ) -> Self {
        self.add_rows(target, Some(selection), args, rows);
        self
    }

    pub fn with_bytes(mut self, target: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_bytes(target, bytes.into());
        self
    }

    pub fn with_file(mut self, target: &str, path: impl Into<PathBuf>) -> Self {
        self.add_file(target, path);
        self
    }

    /// A stream for `target` that yields `prefix` and then fails mid-read.
    pub fn with_broken_stream(mut self, target: &str, prefix: impl Into<Vec<u8>>) -> Self {
        self.sources
            .insert(target.to_string(), Source::Broken(prefix.into()));
        self
    }

    pub fn with_failure(mut self, target: &str) -> Self {
        self.add_failure(target);
        self
    }

    /// All recorded accesses, oldest first.
    pub fn journal(&self) -> Vec<ProviderCall> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn query_count(&self) -> usize {
        self.journal()
            .iter()
            .filter(|c| matches!(c, ProviderCall::Query { .. }))
            .count()
    }

    /// True if any recorded query asked for `column`.
    pub fn queried_column(&self, column: &str) -> bool {
        self.journal().iter().any(|c| match c {
            ProviderCall::Query { columns, .. } => columns.iter().any(|c| c == column),
            ProviderCall::Open { .. } => false,
        })
    }

    pub fn clear_journal(&self) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: ProviderCall) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn check_failing(&self, target: &str) -> Result<(), ProviderError> {
        if self.failing.contains(target) {
            return Err(ProviderError::Unavailable(format!("{target} refused access")));
        }
        Ok(())
    }
}

impl ContentProvider for MemoryProvider {
    fn query(
        &self,
        target: &str,
        columns: &[&str],
        selection: Option<&str>,
        args: &[&str],
    ) -> Result<Vec<Row>, ProviderError> {
        self.record(ProviderCall::Query {
            target: target.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            selection: selection.map(str::to_string),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        self.check_failing(target)?;

        let rows = self
            .rows
            .get(&QueryKey::new(target, selection, args))
            .map(|rows| rows.iter().map(|r| r.project(columns)).collect())
            .unwrap_or_default();
        Ok(rows)
    }

    fn open_read(&self, target: &str) -> Result<ContentStream, ProviderError> {
        self.record(ProviderCall::Open {
            target: target.to_string(),
        });
        self.check_failing(target)?;

        match self.sources.get(target) {
            Some(Source::Bytes(bytes)) => Ok(ContentStream::from_bytes(bytes.clone())),
            Some(Source::File(path)) => {
                let file = File::open(path)?;
                let available = file.metadata()?.len();
                Ok(ContentStream::new(Box::new(file), available))
            }
            Some(Source::Broken(prefix)) => {
                let available = prefix.len() as u64;
                let reader = io::Cursor::new(prefix.clone()).chain(FailingReader);
                Ok(ContentStream::new(Box::new(reader), available))
            }
            None => Err(ProviderError::Unavailable(format!("no stream for {target}"))),
        }
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream closed by provider"))
    }
}
