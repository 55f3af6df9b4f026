//! `docpath config` – print config path and effective values.

use anyhow::Result;
use docpath_core::config::{self, DocpathConfig};
use std::io::Write;

pub fn run_config(cfg: &DocpathConfig, out: &mut impl Write) -> Result<()> {
    writeln!(out, "# {}", config::config_path()?.display())?;
    writeln!(out, "# private root: {}", cfg.private_root()?.display())?;
    write!(out, "{}", cfg.to_toml()?)?;
    Ok(())
}
