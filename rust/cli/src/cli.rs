//! Command-line surface of `draftsim`.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::RowsFormat;

#[derive(Parser, Debug)]
#[command(
    name = "draftsim",
    version,
    about = "Sealed-deck draft simulator",
    long_about = "Simulates many sealed drafts from a card set and reports what the resulting decks look like."
)]
pub struct DraftsimCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run N independent drafts and report cross-deck statistics
    Simulate(SimulateArgs),
    /// Open one pool and print the deck built from it
    Build(BuildArgs),
    /// List the known archetypes
    Archetypes,
    /// Print the resolved configuration and where each value came from
    Cfg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Fixed,
    Weighted,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SamplingArg {
    Rarity,
    Uniform,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Card catalog JSON (Scryfall-style, optionally .zst)
    #[arg(long)]
    pub catalog: Option<String>,
    /// Set code to draft
    #[arg(long = "set")]
    pub set_code: Option<String>,
}

/// Pool sampling and deck ranking; shared so `build` can replay any `simulate` trial.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    #[arg(long, value_enum)]
    pub sampling: Option<SamplingArg>,
    /// Swap in creatures until the deck has at least this many
    #[arg(long)]
    pub min_creatures: Option<usize>,
    /// Rank purely by rarity and mana value, without curve caps
    #[arg(long)]
    pub no_curve: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub source: CatalogArgs,
    #[arg(long)]
    pub trials: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Archetype tag for fixed mode (e.g. WU, MONO_R, 5C)
    #[arg(long)]
    pub archetype: Option<String>,
    /// Weighted distribution, e.g. "WU=0.5,UB=0.3,auto=0.2"
    #[arg(long)]
    pub weights: Option<String>,
    #[command(flatten)]
    pub policy: PolicyArgs,
    /// Write one row per deck card
    #[arg(long)]
    pub rows: Option<String>,
    #[arg(long, value_enum, default_value = "csv")]
    pub rows_format: RowsFormat,
    /// Write the aggregate report as JSON
    #[arg(long)]
    pub report: Option<String>,
    /// Write one JSON line per trial
    #[arg(long)]
    pub trial_log: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: CatalogArgs,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Archetype tag; detected from the pool when omitted
    #[arg(long)]
    pub archetype: Option<String>,
    /// Which trial of the seed to replay
    #[arg(long, default_value_t = 0)]
    pub trial: usize,
    #[command(flatten)]
    pub policy: PolicyArgs,
}
