//! greedyviz CLI.
//!
//! Walks, verifies and generates greedy-algorithm step sequences.

use std::process::ExitCode;

use clap::Parser;
use greedyviz::cli::{run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .with_target(false)
        .init();

    run_cli(args)
}
