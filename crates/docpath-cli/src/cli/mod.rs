//! CLI for the docpath reference resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docpath_core::config;
use docpath_core::CapabilityTier;
use std::io;
use std::path::PathBuf;

use commands::{run_classify, run_config, run_resolve, ResolveArgs};

/// Top-level CLI for docpath.
#[derive(Debug, Parser)]
#[command(name = "docpath")]
#[command(about = "docpath: resolve document references to local file paths", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a document reference to a path.
    Resolve {
        /// Reference to resolve (content:// or file://).
        uri: String,

        /// TOML manifest declaring provider rows, streams and storage roots.
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Capability tier: legacy, modern or scoped (default from config).
        #[arg(long)]
        tier: Option<CapabilityTier>,

        /// Print the bare path, or `null` when unresolved; never fails.
        #[arg(long)]
        legacy: bool,
    },

    /// Show which provider category and strategy a reference maps to.
    Classify {
        /// Reference to classify.
        uri: String,

        /// Capability tier: legacy, modern or scoped (default from config).
        #[arg(long)]
        tier: Option<CapabilityTier>,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let mut out = io::stdout().lock();

        match cli.command {
            CliCommand::Resolve {
                uri,
                manifest,
                tier,
                legacy,
            } => {
                let args = ResolveArgs {
                    uri,
                    manifest,
                    tier: tier.unwrap_or(cfg.tier),
                    legacy,
                };
                run_resolve(&cfg, &args, &mut out)?;
            }
            CliCommand::Classify { uri, tier } => {
                run_classify(&uri, tier.unwrap_or(cfg.tier), &mut out)?;
            }
            CliCommand::Config => run_config(&cfg, &mut out)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
