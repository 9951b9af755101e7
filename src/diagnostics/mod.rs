//! Typed diagnostic events.
//!
//! The loader and assembler report what happened (series fetched, series
//! dropped, gaps after alignment, skipped inflation rates) through a
//! `DiagnosticSink`. The binary installs `TracingSink`; tests use
//! `RecordingSink` and assert on the captured events.

use std::sync::Mutex;

use chrono::NaiveDate;

use crate::domain::{Cadence, Indicator};

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    SeriesFetched {
        indicator: Indicator,
        observations: usize,
    },
    /// A secondary indicator failed or came back empty; its block is omitted.
    SeriesUnavailable {
        indicator: Indicator,
        reason: String,
    },
    /// Labels with no value after alignment. Gaps are expected when the
    /// series publishes less often than the labels it was aligned onto.
    AlignmentGaps {
        indicator: Indicator,
        cadence: Cadence,
        labels_cadence: Cadence,
        labels: usize,
        missing: usize,
    },
    AnnualRateSkipped {
        indicator: Indicator,
        observations: usize,
        reason: String,
    },
    SnapshotAssembled {
        as_of: NaiveDate,
        spread: f64,
        points: usize,
    },
    /// A load finished after a newer one was issued and was discarded.
    LoadSuperseded { sequence: u64, latest: u64 },
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::SeriesFetched {
                indicator,
                observations,
            } => {
                tracing::debug!(indicator = %indicator, observations, "series fetched");
            }
            DiagnosticEvent::SeriesUnavailable { indicator, reason } => {
                tracing::warn!(indicator = %indicator, %reason, "series unavailable, block omitted");
            }
            DiagnosticEvent::AlignmentGaps {
                indicator,
                cadence,
                labels_cadence,
                labels,
                missing,
            } => {
                if cadence > labels_cadence {
                    tracing::debug!(indicator = %indicator, ?cadence, labels, missing, "aligned with gaps");
                } else {
                    tracing::info!(
                        indicator = %indicator,
                        ?cadence,
                        labels,
                        missing,
                        "unexpected gaps after alignment"
                    );
                }
            }
            DiagnosticEvent::AnnualRateSkipped {
                indicator,
                observations,
                reason,
            } => {
                tracing::info!(indicator = %indicator, observations, %reason, "annual rate skipped");
            }
            DiagnosticEvent::SnapshotAssembled {
                as_of,
                spread,
                points,
            } => {
                tracing::info!(%as_of, spread, points, "snapshot assembled");
            }
            DiagnosticEvent::LoadSuperseded { sequence, latest } => {
                tracing::debug!(sequence, latest, "stale load discarded");
            }
        }
    }
}

/// Captures events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: DiagnosticEvent) {}
}
