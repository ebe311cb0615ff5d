//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod schedule;
pub mod session;
pub mod util;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a document command to its handler.
pub fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Schedule(args) => schedule::handle(args, settings),
        Command::Session(args) => session::handle(args, settings),
        Command::Config(args) => config_cmd::handle(args, settings),
        // Handled before settings are resolved
        Command::Completions(_) => Ok(()),
    }
}
