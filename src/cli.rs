// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::pipeline::DEFAULT_DEFINITION_FILE;

/// Command-line arguments for `assetdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetdag",
    version,
    about = "Validate and run data pipelines made of dependent assets.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETDAG_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Lint a pipeline definition and report every issue found.
    Validate {
        /// Path to the pipeline definition (TOML).
        #[arg(value_name = "PATH", default_value = DEFAULT_DEFINITION_FILE)]
        path: PathBuf,
    },
    /// Validate, then execute the pipeline.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the pipeline definition (TOML).
    #[arg(value_name = "PATH", default_value = DEFAULT_DEFINITION_FILE)]
    pub path: PathBuf,

    /// Number of assets allowed to run at the same time.
    ///
    /// Defaults to the available parallelism of the machine.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Only run assets carrying this tag (repeatable).
    #[arg(long = "tag", value_name = "TAG")]
    pub include_tags: Vec<String>,

    /// Skip assets carrying this tag (repeatable).
    #[arg(long = "exclude-tag", value_name = "TAG")]
    pub exclude_tags: Vec<String>,

    /// Run even if validation reports issues.
    #[arg(long)]
    pub skip_validation: bool,
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
