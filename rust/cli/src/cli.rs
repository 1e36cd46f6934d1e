//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "holdem",
    version,
    about = "Texas Hold'em table engine: evaluate, deal and simulate hands"
)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Best five-card hand out of 5 to 7 cards
    Eval {
        /// Cards such as "As Ks Qs Js Ts 2d 2c"
        #[arg(long)]
        cards: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Deal one hand and check it down to showdown
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
    },
    /// Play many hands with a random policy
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        #[arg(long)]
        seed: Option<u64>,
        /// Append one JSON line per hand to this file
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
