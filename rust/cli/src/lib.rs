//! # holdem CLI Library
//!
//! Command-line front end for the `holdem-engine` table engine.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```
//! use std::io;
//! let args = vec!["holdem", "eval", "--cards", "As Ks Qs Js Ts 2d 2c"];
//! let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `eval`: Best five-card hand out of 5 to 7 cards
//! - `deal`: Deal one hand and check it down to showdown
//! - `sim`: Play many hands with a random policy, optionally writing JSONL hand histories
//! - `cfg`: Display the resolved configuration and its sources

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{Commands, HoldemCli};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["eval", "deal", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses `args` (program name first) and dispatches to the subcommand.
/// `deal` and `sim` take their stakes from the resolved configuration; a
/// `--seed` flag wins over the configured seed.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`].
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["holdem", "deal", "--seed", "42"];
/// let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Eval { cards, json } => handle_eval_command(&cards, json, out),
        Commands::Deal { seed, players } => load_config(err).and_then(|cfg| {
            let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
            handle_deal_command(seed, players, cfg.table_settings(), out)
        }),
        Commands::Sim {
            hands,
            players,
            seed,
            output,
        } => load_config(err).and_then(|cfg| {
            handle_sim_command(
                hands,
                players,
                seed.or(cfg.seed),
                output,
                cfg.table_settings(),
                out,
                err,
            )
        }),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        // cfg reports its own failure
        Err(CliError::Config(_)) => exit_code::ERROR,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn load_config(err: &mut dyn Write) -> Result<config::Config, CliError> {
    match config::load_with_sources() {
        Ok(r) => Ok(r.config),
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            Err(CliError::Config(e.to_string()))
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: holdem <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: holdem --help");
    exit_code::ERROR
}
