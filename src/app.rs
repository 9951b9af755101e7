//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - picks a series provider (FRED or offline sample data)
//! - loads and assembles a snapshot
//! - prints reports/plots or hands off to the TUI
//! - writes optional exports

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;

use crate::cli::{Command, DashboardArgs, SummaryArgs};
use crate::data::{FredClient, SampleProvider, SeriesProvider};
use crate::diagnostics::TracingSink;
use crate::domain::{DashboardConfig, Spread};
use crate::error::AppError;

pub mod pipeline;
pub mod sequence;

/// Entry point for the `rates` binary.
pub fn run() -> Result<(), AppError> {
    // We want `rates` and `rates --range 5y` to behave like `rates tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    crate::logging::init_stderr()?;
    let config = summary_config_from_args(&args)?;
    let today = today();
    let provider = provider_for(&config, today)?;

    let out = pipeline::load(
        provider.as_ref(),
        config.range,
        config.spread,
        today,
        config.ma_window,
        &TracingSink,
    )?;

    println!("{}", crate::report::format_summary(&out.snapshot));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &out.snapshot.history,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::write_history_csv(path, &out.snapshot)?;
        tracing::info!(path = %path.display(), "history exported");
    }
    if let Some(path) = &config.export_json {
        crate::io::write_snapshot_json(path, &out.snapshot)?;
        tracing::info!(path = %path.display(), "snapshot exported");
    }

    Ok(())
}

fn handle_tui(args: DashboardArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args)?;
    let _log_guard = crate::logging::init_file(&config.log_file)?;
    let today = today();
    let provider = provider_for(&config, today)?;
    crate::tui::run(config, provider, today)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Seeded sample data when offline, FRED otherwise.
pub fn provider_for(config: &DashboardConfig, today: NaiveDate) -> Result<Arc<dyn SeriesProvider>, AppError> {
    if config.offline {
        return Ok(Arc::new(SampleProvider::new(config.seed, today)));
    }
    Ok(Arc::new(FredClient::from_env()?))
}

pub fn dashboard_config_from_args(args: &DashboardArgs) -> Result<DashboardConfig, AppError> {
    Ok(DashboardConfig {
        range: args.range,
        spread: Spread::new(args.spread)?,
        offline: args.offline,
        seed: args.seed,
        ma_window: args.ma_window,
        plot: false,
        plot_width: 100,
        plot_height: 20,
        export_csv: None,
        export_json: None,
        log_file: args.log_file.clone(),
    })
}

pub fn summary_config_from_args(args: &SummaryArgs) -> Result<DashboardConfig, AppError> {
    Ok(DashboardConfig {
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        ..dashboard_config_from_args(&args.dashboard)?
    })
}

/// Rewrite argv so `rates` defaults to `rates tui`.
///
/// Rules:
/// - `rates`                        -> `rates tui`
/// - `rates --range 5y ...`         -> `rates tui --range 5y ...`
/// - `rates --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "summary" | "tui") {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(args(&["rates"])), args(&["rates", "tui"]));
        assert_eq!(
            rewrite_args(args(&["rates", "--offline"])),
            args(&["rates", "tui", "--offline"])
        );
        assert_eq!(
            rewrite_args(args(&["rates", "summary", "--offline"])),
            args(&["rates", "summary", "--offline"])
        );
        assert_eq!(rewrite_args(args(&["rates", "--help"])), args(&["rates", "--help"]));
    }

    #[test]
    fn out_of_bounds_spread_is_a_usage_error() {
        let cli = Cli::parse_from(args(&["rates", "tui", "--spread", "5"]));
        let Command::Tui(tui_args) = cli.command else {
            panic!("expected tui");
        };
        let err = dashboard_config_from_args(&tui_args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_plot_wins() {
        let cli = Cli::parse_from(args(&["rates", "summary", "--no-plot", "--width", "60"]));
        let Command::Summary(summary) = cli.command else {
            panic!("expected summary");
        };
        let config = summary_config_from_args(&summary).unwrap();
        assert!(!config.plot);
        assert_eq!(config.plot_width, 60);
    }

    #[test]
    fn offline_uses_sample_provider() {
        let cli = Cli::parse_from(args(&["rates", "summary", "--offline"]));
        let Command::Summary(summary) = cli.command else {
            panic!("expected summary");
        };
        let config = summary_config_from_args(&summary).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(provider_for(&config, today).unwrap().name(), "sample");
    }
}
