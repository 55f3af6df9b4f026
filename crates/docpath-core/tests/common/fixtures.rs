//! Shared builders for resolver integration tests.

#![allow(dead_code)]

use docpath_core::external_roots::ExternalRoots;
use docpath_core::provider::{MemoryProvider, StaticEnvironment};
use docpath_core::Resolver;
use std::path::Path;

pub type TestResolver = Resolver<MemoryProvider, StaticEnvironment>;

/// Resolver over `provider` with `private` as the private root and no external roots.
pub fn resolver(provider: MemoryProvider, private: &Path) -> TestResolver {
    resolver_with_roots(provider, private, ExternalRoots::default())
}

pub fn resolver_with_roots(provider: MemoryProvider, private: &Path, roots: ExternalRoots) -> TestResolver {
    Resolver::new(provider, StaticEnvironment::new(private, roots))
}

/// Deterministic, non-repeating-at-small-scale body of `len` bytes.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + i / 251) % 256) as u8).collect()
}

/// Names of entries directly under `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
