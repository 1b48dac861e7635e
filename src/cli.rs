// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `sequencer`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sequencer",
    version,
    about = "Play a timeline of simulated clips through the animation sequencer.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the timeline file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SEQUENCER_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse and validate, print clips, constraints and start order, but
    /// play nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Drive the clock from wall time instead of a virtual clock. Ctrl-C
    /// cancels the sequence.
    #[arg(long)]
    pub realtime: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
