//! CLI module for greedyviz.
//!
//! All command logic lives here so it can be tested without spawning a
//! process; `main.rs` only parses arguments, installs logging and calls
//! [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, CommonArgs, GenerateArgs, RunArgs, VerifyArgs};
pub use commands::{execute, load_config, run_cli};
pub use output::{format_check, format_summary};
