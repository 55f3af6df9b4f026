use docpath_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Fall back to stderr so an unwritable state dir does not stop the CLI.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("docpath error: {:#}", err);
        std::process::exit(1);
    }
}
