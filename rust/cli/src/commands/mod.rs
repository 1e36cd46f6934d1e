//! Command handlers for the `holdem` CLI.
//!
//! Each command lives in its own module and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, writing to injected
//! `&mut dyn Write` streams.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::handle_sim_command;
