//! Shared "load then assemble" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! provider fan-out -> series bundle -> snapshot assembly
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::data::SeriesProvider;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::{Indicator, Series, SeriesRequest, Spread, TimeRange};
use crate::error::{DashboardError, ProviderError};
use crate::snapshot::{DashboardSnapshot, SeriesBundle, assemble};

/// Everything one load produces. The bundle is kept for spread-only recomputes.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub bundle: SeriesBundle,
    pub snapshot: DashboardSnapshot,
}

/// Fetch every indicator for `range` and assemble a snapshot.
pub fn load(
    provider: &dyn SeriesProvider,
    range: TimeRange,
    spread: Spread,
    today: NaiveDate,
    ma_window: usize,
    sink: &dyn DiagnosticSink,
) -> Result<LoadOutput, DashboardError> {
    let bundle = fetch_bundle(provider, range, today, sink)?;
    let snapshot = assemble(&bundle, spread, ma_window, sink)?;
    Ok(LoadOutput { bundle, snapshot })
}

/// Re-derive a snapshot from cached series under a new spread.
///
/// Never contacts the provider.
pub fn recompute(
    bundle: &SeriesBundle,
    spread: Spread,
    ma_window: usize,
    sink: &dyn DiagnosticSink,
) -> Result<DashboardSnapshot, DashboardError> {
    assemble(bundle, spread, ma_window, sink)
}

/// One concurrent provider call per indicator, joined before returning.
///
/// A failed secondary indicator becomes an empty series; a failed 10-year
/// fetch fails the whole load.
pub fn fetch_bundle(
    provider: &dyn SeriesProvider,
    range: TimeRange,
    today: NaiveDate,
    sink: &dyn DiagnosticSink,
) -> Result<SeriesBundle, DashboardError> {
    let start = range.start_date(today);
    tracing::debug!(provider = provider.name(), range = range.label(), ?start, "loading series");

    let results: Vec<(Indicator, Result<Series, ProviderError>)> = Indicator::ALL
        .par_iter()
        .map(|&indicator| {
            let request = SeriesRequest {
                indicator,
                start,
                end: Some(today),
            };
            (indicator, provider.fetch(&request))
        })
        .collect();

    let mut bundle = SeriesBundle::empty(range);
    for (indicator, result) in results {
        match result {
            Ok(series) => {
                sink.emit(DiagnosticEvent::SeriesFetched {
                    indicator,
                    observations: series.len(),
                });
                bundle.set(series);
            }
            Err(err) if indicator.is_primary() => {
                return Err(DashboardError::FatalDataUnavailable {
                    indicator,
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                sink.emit(DiagnosticEvent::SeriesUnavailable {
                    indicator,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(bundle)
}
