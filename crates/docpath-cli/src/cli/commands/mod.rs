//! CLI command handlers. Each writes its report to the given writer.

mod classify;
mod config;
mod resolve;

pub use classify::run_classify;
pub use config::run_config;
pub use resolve::{run_resolve, ResolveArgs};
