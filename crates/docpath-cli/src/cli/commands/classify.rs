//! `docpath classify` – show category and strategy for a reference.

use anyhow::{Context, Result};
use docpath_core::strategy::Strategy;
use docpath_core::{CapabilityTier, DocumentReference};
use std::io::Write;

pub fn run_classify(uri: &str, tier: CapabilityTier, out: &mut impl Write) -> Result<()> {
    let reference = DocumentReference::parse(uri).with_context(|| format!("parsing {uri}"))?;
    let strategy = Strategy::for_reference(&reference, tier);
    writeln!(out, "category:  {}", strategy.category())?;
    writeln!(out, "strategy:  {strategy}")?;
    writeln!(out, "copies:    {}", if strategy.materializes() { "yes" } else { "no" })?;
    if let Some(id) = reference.document_id() {
        writeln!(out, "document:  {id}")?;
    }
    Ok(())
}
