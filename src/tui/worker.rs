//! Background loads.
//!
//! Each load runs on its own thread and reports back over an `mpsc` channel
//! tagged with its sequence number; the UI thread decides whether to apply it.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use chrono::NaiveDate;

use crate::app::pipeline::{self, LoadOutput};
use crate::data::SeriesProvider;
use crate::diagnostics::TracingSink;
use crate::domain::{Spread, TimeRange};
use crate::error::{AppError, DashboardError};

#[derive(Debug, Clone, Copy)]
pub struct LoadRequest {
    pub sequence: u64,
    pub range: TimeRange,
    pub spread: Spread,
    pub today: NaiveDate,
    pub ma_window: usize,
}

#[derive(Debug)]
pub struct LoadResponse {
    pub sequence: u64,
    pub range: TimeRange,
    pub result: Result<LoadOutput, DashboardError>,
}

/// Run one load on a named background thread.
pub fn spawn_load(
    provider: Arc<dyn SeriesProvider>,
    request: LoadRequest,
    tx: Sender<LoadResponse>,
) -> Result<(), AppError> {
    thread::Builder::new()
        .name(format!("rates-load-{}", request.sequence))
        .spawn(move || {
            let result = pipeline::load(
                provider.as_ref(),
                request.range,
                request.spread,
                request.today,
                request.ma_window,
                &TracingSink,
            );
            // A closed channel means the UI has exited; nothing to report to.
            let _ = tx.send(LoadResponse {
                sequence: request.sequence,
                range: request.range,
                result,
            });
        })
        .map(|_| ())
        .map_err(|e| AppError::new(4, format!("Failed to spawn load thread: {e}")))
}
