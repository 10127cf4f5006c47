//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

use crate::engine::AlgorithmKind;
use crate::renderers::TraceFormat;

/// Step through greedy algorithms from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "greedyviz", version, about)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Walk every step of one algorithm and print it.
    Run(RunArgs),
    /// Check generated sequences against independent ground truths.
    Verify(VerifyArgs),
    /// Print a random dataset as YAML.
    Generate(GenerateArgs),
}

/// Options shared by every command that loads a configuration.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Configuration YAML file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments of `run`.
#[derive(Debug, Clone, ClapArgs)]
pub struct RunArgs {
    /// Algorithm to run. Optional when `--dataset` is given.
    #[arg(value_enum)]
    pub algorithm: Option<AlgorithmKind>,

    /// Fixed dataset YAML instead of a random one.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = TraceFormat::Text)]
    pub format: TraceFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments of `verify`.
#[derive(Debug, Clone, ClapArgs)]
pub struct VerifyArgs {
    /// Number of consecutive seeds to check, starting at the configured seed.
    #[arg(long, default_value_t = 100)]
    pub seeds: u64,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments of `generate`.
#[derive(Debug, Clone, ClapArgs)]
pub struct GenerateArgs {
    /// Algorithm to generate a dataset for.
    #[arg(value_enum)]
    pub algorithm: AlgorithmKind,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Args {
    /// Log level selected by `-v` flags; warnings only by default.
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
