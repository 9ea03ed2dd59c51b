//! Command-line parsing for the demand dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the alignment core.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kwh", version, about = "Terminal dashboard for historical vs. forecast energy demand")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and merge one window, print a summary, and optionally export CSV.
    Fetch(FetchArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same fetch-and-merge cycle as `kwh fetch`, but renders
    /// the merged series as a chart and lets you edit the date filter live.
    Tui(FetchArgs),
}

/// Common options for one fetch-and-merge cycle.
#[derive(Debug, Parser, Clone)]
pub struct FetchArgs {
    /// Start day of the filter window (YYYY-MM-DD). Default: 3 months ago.
    #[arg(long)]
    pub start: Option<String>,

    /// End day of the filter window, inclusive (YYYY-MM-DD). Default: 14 days ahead.
    #[arg(long)]
    pub end: Option<String>,

    /// Demand API base URL (overrides KWH_API_URL).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Maximum number of forecast rows to request.
    #[arg(long, default_value_t = 500)]
    pub limit: usize,

    /// Generate synthetic data locally instead of calling the API.
    #[arg(long)]
    pub offline: bool,

    /// Random seed for --offline data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export the merged series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
