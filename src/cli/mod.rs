//! Command-line parsing for the mortgage-rate dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading and assembly code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Spread, TimeRange};
use crate::snapshot::DEFAULT_MA_WINDOW;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rates",
    version,
    about = "Mortgage rate estimates from the 10-year Treasury yield (FRED-based)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load once, print the dashboard, and optionally plot/export.
    Summary(SummaryArgs),
    /// Launch the interactive dashboard.
    ///
    /// Spread changes re-derive the snapshot from cached series; range changes
    /// and refreshes reload in the background.
    Tui(DashboardArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    /// History window to load.
    #[arg(short = 'r', long, value_enum, default_value_t = TimeRange::TwoYears)]
    pub range: TimeRange,

    /// Lender spread over the 10-year yield, in percentage points (1.20-3.00).
    #[arg(short = 's', long, default_value_t = Spread::DEFAULT)]
    pub spread: f64,

    /// Use seeded sample data instead of FRED (no API key needed).
    #[arg(long)]
    pub offline: bool,

    /// Seed for offline sample data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Trailing window (observations) for the 10-year moving average.
    #[arg(long, default_value_t = DEFAULT_MA_WINDOW)]
    pub ma_window: usize,

    /// Log file used by the TUI.
    #[arg(long, default_value = "rates.log")]
    pub log_file: PathBuf,
}

/// Options for the one-shot summary.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export dated history (10Y, estimated 30Y, actual 30Y) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full snapshot to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_flags_parse() {
        let cli = Cli::parse_from([
            "rates", "summary", "--range", "5y", "--spread", "2.1", "--offline", "--no-plot",
            "--export", "out.csv",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.dashboard.range, TimeRange::FiveYears);
        assert_eq!(args.dashboard.spread, 2.1);
        assert!(args.dashboard.offline);
        assert!(args.no_plot);
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn tui_defaults() {
        let cli = Cli::parse_from(["rates", "tui"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.range, TimeRange::TwoYears);
        assert_eq!(args.spread, Spread::DEFAULT);
        assert_eq!(args.ma_window, DEFAULT_MA_WINDOW);
    }
}
