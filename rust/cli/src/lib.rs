//! # Draftsim CLI Library
//!
//! Command-line front end for the `draftsim-engine` sealed draft simulator.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments, executes the subcommand and returns
//! the process exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec![
//!     "draftsim", "simulate", "--catalog", "data/tdm.json", "--set", "tdm",
//!     "--trials", "500", "--seed", "42",
//! ];
//! let code = draftsim_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `simulate`: Run many drafts, print a summary and optionally export rows,
//!   the aggregate report and per-trial records
//! - `build`: Replay one trial and print its deck
//! - `archetypes`: List archetype tags and names
//! - `cfg`: Display the resolved configuration and value sources

use std::io::Write;

pub mod catalog_source;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod export;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod ui;

use clap::Parser;
use cli::{Commands, DraftsimCli};
use commands::{
    handle_archetypes_command, handle_build_command, handle_cfg_command, handle_simulate_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["simulate", "build", "archetypes", "cfg"];

/// Runs the CLI against `args` (program name first).
///
/// # Returns
///
/// Exit code: `0` for success, `2` for any error
///
/// # Example
///
/// ```
/// use std::io;
/// let code = draftsim_cli::run(["draftsim", "archetypes"], &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match DraftsimCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Simulate(args) => handle_simulate_command(args, out, err),
        Commands::Build(args) => handle_build_command(args, out),
        Commands::Archetypes => handle_archetypes_command(out),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            let _ = ui::write_error(err, &e.to_string());
            2
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return if write!(out, "{}", e).is_err() { 2 } else { 0 };
    }

    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err);
    let _ = writeln!(err, "Draftsim sealed draft simulator");
    let _ = writeln!(err, "Usage: draftsim <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: draftsim --help");
    2
}
