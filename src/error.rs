//! Error types.
//!
//! Library code returns small typed errors (`ProviderError`, `DashboardError`,
//! `SpreadError`). The binary boundary converts them into an `AppError`, which
//! carries the process exit code:
//!
//! - `2`: usage / configuration / file problems
//! - `4`: data problems (primary series unavailable, terminal failures)

use thiserror::Error;

use crate::domain::Indicator;

/// Top-level error carrying an exit code for the `rates` binary.
#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

/// Failure fetching one indicator from a series provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("missing FRED_API_KEY in environment (.env)")]
    MissingApiKey,
    #[error("{indicator} request failed: {message}")]
    Request { indicator: Indicator, message: String },
    #[error("{indicator} request failed with status {status}")]
    Status { indicator: Indicator, status: u16 },
    #[error("failed to parse {indicator} response: {message}")]
    Parse { indicator: Indicator, message: String },
}

/// Failure assembling a dashboard snapshot.
///
/// Only the primary indicator can fail a load; secondary indicators degrade
/// to omitted snapshot blocks instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("no {indicator} data available: {reason}")]
    FatalDataUnavailable { indicator: Indicator, reason: String },
}

/// Rejected spread value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpreadError {
    #[error("spread must be a finite number")]
    NotFinite,
    #[error("spread {value:.2} is outside {min:.2}..={max:.2}")]
    OutOfBounds { value: f64, min: f64, max: f64 },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        let exit_code = match err {
            ProviderError::MissingApiKey => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl From<SpreadError> for AppError {
    fn from(err: SpreadError) -> Self {
        AppError::new(2, err.to_string())
    }
}
