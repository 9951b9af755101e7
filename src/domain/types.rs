//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the provider, the assembler, and the front-ends
//! - exported to JSON/CSV
//! - compared bit-for-bit in tests

use std::fmt;
use std::path::PathBuf;

use chrono::{Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SpreadError;
use crate::math::round_to;

/// Publication cadence of an indicator, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

/// The fixed set of economic indicators the dashboard loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// 10-year constant-maturity Treasury yield (primary indicator).
    Treasury10Y,
    /// Freddie Mac 30-year fixed mortgage average.
    Mortgage30Y,
    /// Freddie Mac 15-year fixed mortgage average.
    Mortgage15Y,
    /// Consumer price index, all urban consumers.
    Cpi,
    /// Core personal consumption expenditures price index.
    CorePce,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Treasury10Y,
        Indicator::Mortgage30Y,
        Indicator::Mortgage15Y,
        Indicator::Cpi,
        Indicator::CorePce,
    ];

    /// FRED series id.
    pub fn series_id(self) -> &'static str {
        match self {
            Indicator::Treasury10Y => "DGS10",
            Indicator::Mortgage30Y => "MORTGAGE30US",
            Indicator::Mortgage15Y => "MORTGAGE15US",
            Indicator::Cpi => "CPIAUCSL",
            Indicator::CorePce => "PCEPILFE",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::Treasury10Y => "10-Year Treasury",
            Indicator::Mortgage30Y => "30-Year Mortgage",
            Indicator::Mortgage15Y => "15-Year Mortgage",
            Indicator::Cpi => "CPI",
            Indicator::CorePce => "Core PCE",
        }
    }

    pub fn cadence(self) -> Cadence {
        match self {
            Indicator::Treasury10Y => Cadence::Daily,
            Indicator::Mortgage30Y | Indicator::Mortgage15Y => Cadence::Weekly,
            Indicator::Cpi | Indicator::CorePce => Cadence::Monthly,
        }
    }

    /// The primary indicator must be present for a load to succeed.
    pub fn is_primary(self) -> bool {
        self == Indicator::Treasury10Y
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single dated value from an economic series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered observations for one indicator over one queried range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub indicator: Indicator,
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series, sorting observations ascending by date.
    ///
    /// The sort is stable, so duplicate dates keep their provider order.
    pub fn new(indicator: Indicator, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self {
            indicator,
            observations,
        }
    }

    pub fn empty(indicator: Indicator) -> Self {
        Self {
            indicator,
            observations: Vec::new(),
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// `(current, previous)` values; previous falls back to current for a
    /// single-observation series.
    pub fn current_and_previous(&self) -> Option<(f64, f64)> {
        let n = self.observations.len();
        let current = self.observations.last()?.value;
        let previous = if n >= 2 {
            self.observations[n - 2].value
        } else {
            current
        };
        Some((current, previous))
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }
}

/// A value positioned on a reference date label; `None` marks a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// One provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesRequest {
    pub indicator: Indicator,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Selectable history window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum TimeRange {
    #[serde(rename = "1m")]
    #[value(name = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    #[value(name = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    #[value(name = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "2y")]
    #[value(name = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    #[value(name = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    #[value(name = "10y")]
    TenYears,
    #[serde(rename = "max")]
    #[value(name = "max")]
    Max,
}

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::TwoYears,
        TimeRange::FiveYears,
        TimeRange::TenYears,
        TimeRange::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::TwoYears => "2Y",
            TimeRange::FiveYears => "5Y",
            TimeRange::TenYears => "10Y",
            TimeRange::Max => "MAX",
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            TimeRange::OneMonth => Some(1),
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::OneYear => Some(12),
            TimeRange::TwoYears => Some(24),
            TimeRange::FiveYears => Some(60),
            TimeRange::TenYears => Some(120),
            TimeRange::Max => None,
        }
    }

    /// Observation start for a window ending on `today`; `None` means the
    /// provider's full history.
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        today.checked_sub_months(Months::new(months))
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Lender markup (percentage points) added to the 10-year yield.
///
/// Serialized as a bare number; deserializing goes through `Spread::new`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Spread(f64);

impl Spread {
    pub const MIN: f64 = 1.2;
    pub const MAX: f64 = 3.0;
    pub const STEP: f64 = 0.05;
    pub const DEFAULT: f64 = 1.8;

    pub fn new(value: f64) -> Result<Self, SpreadError> {
        if !value.is_finite() {
            return Err(SpreadError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(SpreadError::OutOfBounds {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn step_up(self) -> Self {
        self.step_by(1.0)
    }

    pub fn step_down(self) -> Self {
        self.step_by(-1.0)
    }

    // Snap to the 0.05 grid first so an off-grid CLI value lands on a step.
    fn step_by(self, steps: f64) -> Self {
        let snapped = (self.0 / Self::STEP).round() + steps;
        let next = round_to(snapped * Self::STEP, 2).clamp(Self::MIN, Self::MAX);
        Self(next)
    }
}

impl TryFrom<f64> for Spread {
    type Error = SpreadError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Spread> for f64 {
    fn from(spread: Spread) -> f64 {
        spread.0
    }
}

impl Default for Spread {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A full run's configuration as understood by the front-ends.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub range: TimeRange,
    pub spread: Spread,
    /// Use the seeded sample provider instead of FRED.
    pub offline: bool,
    pub seed: u64,
    /// Trailing window (observations) for the 10Y moving average.
    pub ma_window: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub log_file: PathBuf,
}
