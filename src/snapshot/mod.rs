//! Dashboard view model.
//!
//! A `DashboardSnapshot` is built wholesale by `assemble` from one
//! `SeriesBundle` and one spread. It is never mutated; a spread change or a
//! reload produces a new snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::align::{AlignedSeries, UnionAlignment};
use crate::domain::{Indicator, Observation, Series, Spread, TimeRange};
use crate::math::ValueRange;

pub mod assembler;

pub use assembler::*;

/// The series fetched by one load, kept so spread changes can be re-derived
/// without another fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBundle {
    pub range: TimeRange,
    pub treasury_10y: Series,
    pub mortgage_30y: Series,
    pub mortgage_15y: Series,
    pub cpi: Series,
    pub core_pce: Series,
}

impl SeriesBundle {
    /// A bundle with every series empty.
    pub fn empty(range: TimeRange) -> Self {
        Self {
            range,
            treasury_10y: Series::empty(Indicator::Treasury10Y),
            mortgage_30y: Series::empty(Indicator::Mortgage30Y),
            mortgage_15y: Series::empty(Indicator::Mortgage15Y),
            cpi: Series::empty(Indicator::Cpi),
            core_pce: Series::empty(Indicator::CorePce),
        }
    }

    pub fn get(&self, indicator: Indicator) -> &Series {
        match indicator {
            Indicator::Treasury10Y => &self.treasury_10y,
            Indicator::Mortgage30Y => &self.mortgage_30y,
            Indicator::Mortgage15Y => &self.mortgage_15y,
            Indicator::Cpi => &self.cpi,
            Indicator::CorePce => &self.core_pce,
        }
    }

    /// Replace the series for `series.indicator`.
    pub fn set(&mut self, series: Series) {
        match series.indicator {
            Indicator::Treasury10Y => self.treasury_10y = series,
            Indicator::Mortgage30Y => self.mortgage_30y = series,
            Indicator::Mortgage15Y => self.mortgage_15y = series,
            Indicator::Cpi => self.cpi = series,
            Indicator::CorePce => self.core_pce = series,
        }
    }
}

/// Latest value of an indicator with its prior observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub date: NaiveDate,
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
}

/// Mortgage rates implied by today's yield and spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedRates {
    pub rate_30y: f64,
    pub rate_15y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationReading {
    pub reading: Reading,
    /// Year-over-year change in percent; `None` with too little history.
    pub annual_rate: Option<f64>,
    /// Change from the prior observation in percent.
    pub monthly_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationBlock {
    pub cpi: InflationReading,
    pub core_pce: InflationReading,
}

/// Summary statistics over the loaded 10-year yield window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldStatistics {
    pub volatility: f64,
    pub range: ValueRange,
    /// Fractional change from the first to the last observation.
    pub period_change: f64,
    /// Where the latest yield sits in the period range, `0` = low, `1` = high.
    pub range_position: f64,
    pub moving_average_window: usize,
    /// Each average is dated on the last observation of its window.
    pub moving_average: Vec<Observation>,
}

/// Chart-ready series.
///
/// `dates` are the 10-year yield dates; every series except `inflation` is
/// positioned on them. CPI and Core PCE carry their own union labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub dates: Vec<NaiveDate>,
    pub treasury_10y: Vec<f64>,
    pub estimated_30y: Vec<f64>,
    pub estimated_15y: Vec<f64>,
    pub actual_30y: Option<AlignedSeries>,
    pub actual_15y: Option<AlignedSeries>,
    pub inflation: Option<UnionAlignment>,
}

/// One row of the tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub treasury_10y: f64,
    pub estimated_30y: f64,
    pub actual_30y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub range: TimeRange,
    pub spread: Spread,
    pub treasury: Reading,
    pub estimated: EstimatedRates,
    pub actual_30y: Option<Reading>,
    pub actual_15y: Option<Reading>,
    pub inflation: Option<InflationBlock>,
    pub statistics: YieldStatistics,
    pub history: History,
}

impl DashboardSnapshot {
    /// Rows for file export, one per 10-year yield date.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let actual = self.history.actual_30y.as_ref().map(|a| a.values());
        self.history
            .dates
            .iter()
            .enumerate()
            .map(|(i, &date)| ExportRow {
                date,
                treasury_10y: self.history.treasury_10y[i],
                estimated_30y: self.history.estimated_30y[i],
                actual_30y: actual.as_ref().and_then(|v| v.get(i).copied().flatten()),
            })
            .collect()
    }
}
