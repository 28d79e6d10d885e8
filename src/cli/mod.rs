//! CLI module
//!
//! Provides command-line interface for:
//! - query: one-shot list request
//! - explain: one-shot explain of a list request
//! - start: serving loop over stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, query, run_command, start, ListRequest, Mode, RequestError, Service};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
