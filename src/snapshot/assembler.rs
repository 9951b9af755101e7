//! Builds a `DashboardSnapshot` from fetched series and a spread.
//!
//! Assembly is pure: the same bundle, spread, and window always yield the
//! same snapshot. Only an empty 10-year series is fatal; every other missing
//! series drops its block and reports a diagnostic.

use chrono::Months;

use crate::align::{align_to_reference, align_union, AlignedSeries};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::domain::{Cadence, Indicator, Observation, Series, Spread};
use crate::error::DashboardError;
use crate::math::{
    annual_inflation_rate, delta, estimate_15_year_rate, estimate_rate, moving_average,
    monthly_inflation_rate, normalize, percent_change, range, volatility,
};
use crate::snapshot::{
    DashboardSnapshot, EstimatedRates, History, InflationBlock, InflationReading, Reading,
    SeriesBundle, YieldStatistics,
};

/// Trailing window (observations) for the 10-year moving average.
pub const DEFAULT_MA_WINDOW: usize = 20;

/// Monthly series shorter than this get no annual rate.
pub const MIN_ANNUAL_OBSERVATIONS: usize = 10;

pub fn assemble(
    bundle: &SeriesBundle,
    spread: Spread,
    ma_window: usize,
    sink: &dyn DiagnosticSink,
) -> Result<DashboardSnapshot, DashboardError> {
    let treasury_series = &bundle.treasury_10y;
    let Some(treasury) = reading(treasury_series) else {
        return Err(DashboardError::FatalDataUnavailable {
            indicator: Indicator::Treasury10Y,
            reason: "series is empty".to_string(),
        });
    };

    let s = spread.value();
    let estimated = EstimatedRates {
        rate_30y: estimate_rate(treasury.current, s),
        rate_15y: estimate_15_year_rate(treasury.current, s),
    };

    let actual_30y = optional_reading(&bundle.mortgage_30y, sink);
    let actual_15y = optional_reading(&bundle.mortgage_15y, sink);
    let inflation = inflation_block(bundle, sink);

    let statistics = yield_statistics(treasury_series, ma_window);
    let history = history(bundle, s, sink);

    sink.emit(DiagnosticEvent::SnapshotAssembled {
        as_of: treasury.date,
        spread: s,
        points: history.dates.len(),
    });

    Ok(DashboardSnapshot {
        as_of: treasury.date,
        range: bundle.range,
        spread,
        treasury,
        estimated,
        actual_30y,
        actual_15y,
        inflation,
        statistics,
        history,
    })
}

fn reading(series: &Series) -> Option<Reading> {
    let date = series.latest()?.date;
    let (current, previous) = series.current_and_previous()?;
    Some(Reading {
        date,
        current,
        previous,
        delta: delta(current, previous),
    })
}

fn optional_reading(series: &Series, sink: &dyn DiagnosticSink) -> Option<Reading> {
    let r = reading(series);
    if r.is_none() {
        sink.emit(DiagnosticEvent::SeriesUnavailable {
            indicator: series.indicator,
            reason: "no observations in range".to_string(),
        });
    }
    r
}

fn inflation_block(bundle: &SeriesBundle, sink: &dyn DiagnosticSink) -> Option<InflationBlock> {
    let cpi = optional_reading(&bundle.cpi, sink);
    let core_pce = optional_reading(&bundle.core_pce, sink);
    let (cpi, core_pce) = (cpi?, core_pce?);

    Some(InflationBlock {
        cpi: inflation_reading(&bundle.cpi, cpi, sink),
        core_pce: inflation_reading(&bundle.core_pce, core_pce, sink),
    })
}

fn inflation_reading(series: &Series, reading: Reading, sink: &dyn DiagnosticSink) -> InflationReading {
    let annual_rate = match year_ago(series) {
        Ok(year_ago) => Some(annual_inflation_rate(reading.current, year_ago.value)),
        Err(reason) => {
            sink.emit(DiagnosticEvent::AnnualRateSkipped {
                indicator: series.indicator,
                observations: series.len(),
                reason: reason.to_string(),
            });
            None
        }
    };

    InflationReading {
        reading,
        annual_rate,
        monthly_rate: monthly_inflation_rate(reading.current, reading.previous),
    }
}

/// The latest observation on or before twelve months prior to the newest one.
fn year_ago(series: &Series) -> Result<&Observation, &'static str> {
    if series.len() < MIN_ANNUAL_OBSERVATIONS {
        return Err("fewer than 10 observations");
    }
    let latest = series.latest().ok_or("no observations")?;
    let target = latest
        .date
        .checked_sub_months(Months::new(12))
        .ok_or("date out of range")?;

    series
        .observations()
        .iter()
        .rev()
        .find(|o| o.date <= target)
        .ok_or("no observation a year before the latest")
}

fn yield_statistics(series: &Series, ma_window: usize) -> YieldStatistics {
    let values = series.values();
    let dates = series.dates();

    let period_change = match (values.first(), values.last()) {
        (Some(&first), Some(&last)) => percent_change(last, first),
        _ => 0.0,
    };

    let moving_average = moving_average(&values, ma_window)
        .into_iter()
        .enumerate()
        .map(|(i, v)| Observation::new(dates[i + ma_window - 1], v))
        .collect();

    YieldStatistics {
        volatility: volatility(&values),
        range: range(&values),
        period_change,
        range_position: normalize(&values).last().copied().unwrap_or(0.0),
        moving_average_window: ma_window,
        moving_average,
    }
}

fn history(bundle: &SeriesBundle, spread: f64, sink: &dyn DiagnosticSink) -> History {
    let dates = bundle.treasury_10y.dates();
    let treasury_10y = bundle.treasury_10y.values();
    let estimated_30y = treasury_10y.iter().map(|&y| estimate_rate(y, spread)).collect();
    let estimated_15y = treasury_10y
        .iter()
        .map(|&y| estimate_15_year_rate(y, spread))
        .collect();

    let actual = |series: &Series| -> Option<AlignedSeries> {
        if series.is_empty() {
            return None;
        }
        let aligned = align_to_reference(&dates, series.observations());
        report_gaps(series.indicator, bundle.treasury_10y.indicator.cadence(), &aligned, sink);
        Some(aligned)
    };
    let actual_30y = actual(&bundle.mortgage_30y);
    let actual_15y = actual(&bundle.mortgage_15y);

    let inflation = (!bundle.cpi.is_empty() && !bundle.core_pce.is_empty()).then(|| {
        let union = align_union(bundle.cpi.observations(), bundle.core_pce.observations());
        let labels_cadence = Indicator::Cpi.cadence().min(Indicator::CorePce.cadence());
        report_gaps(Indicator::Cpi, labels_cadence, &union.first, sink);
        report_gaps(Indicator::CorePce, labels_cadence, &union.second, sink);
        union
    });

    History {
        dates,
        treasury_10y,
        estimated_30y,
        estimated_15y,
        actual_30y,
        actual_15y,
        inflation,
    }
}

fn report_gaps(
    indicator: Indicator,
    labels_cadence: Cadence,
    aligned: &AlignedSeries,
    sink: &dyn DiagnosticSink,
) {
    let missing = aligned.missing();
    if missing > 0 {
        sink.emit(DiagnosticEvent::AlignmentGaps {
            indicator,
            cadence: indicator.cadence(),
            labels_cadence,
            labels: aligned.len(),
            missing,
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::diagnostics::{NullSink, RecordingSink};
    use crate::domain::TimeRange;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(indicator: Indicator, points: &[(NaiveDate, f64)]) -> Series {
        Series::new(
            indicator,
            points.iter().map(|&(date, v)| Observation::new(date, v)).collect(),
        )
    }

    fn monthly(indicator: Indicator, months: u32, start_level: f64) -> Series {
        let start = d(2024, 1, 1);
        series(
            indicator,
            &(0..months)
                .map(|i| {
                    let date = start.checked_add_months(Months::new(i)).unwrap();
                    (date, start_level + f64::from(i))
                })
                .collect::<Vec<_>>(),
        )
    }

    fn bundle() -> SeriesBundle {
        let mut b = SeriesBundle::empty(TimeRange::OneYear);
        b.set(series(
            Indicator::Treasury10Y,
            &[
                (d(2025, 1, 6), 4.20),
                (d(2025, 1, 7), 4.24),
                (d(2025, 1, 8), 4.10),
                (d(2025, 1, 9), 4.30),
            ],
        ));
        b.set(series(Indicator::Mortgage30Y, &[(d(2025, 1, 9), 6.93)]));
        b.set(series(Indicator::Mortgage15Y, &[(d(2025, 1, 9), 6.14)]));
        b.set(monthly(Indicator::Cpi, 13, 300.0));
        b.set(monthly(Indicator::CorePce, 13, 120.0));
        b
    }

    fn spread() -> Spread {
        Spread::new(1.8).unwrap()
    }

    #[test]
    fn full_bundle_populates_every_block() {
        let snap = assemble(&bundle(), spread(), 2, &NullSink).unwrap();

        assert_eq!(snap.as_of, d(2025, 1, 9));
        assert_eq!(snap.treasury.current, 4.30);
        assert_eq!(snap.treasury.previous, 4.10);
        assert_eq!(snap.treasury.delta, 0.2);
        assert_eq!(snap.estimated.rate_30y, 6.1);
        assert_eq!(snap.estimated.rate_15y, 5.7);
        assert_eq!(snap.actual_30y.unwrap().current, 6.93);
        assert_eq!(snap.actual_15y.unwrap().delta, 0.0);

        let inflation = snap.inflation.unwrap();
        // 312 vs 300 twelve months earlier.
        assert_eq!(inflation.cpi.annual_rate, Some(4.0));
        assert_eq!(inflation.cpi.monthly_rate, 0.322);

        assert_eq!(snap.history.estimated_30y, vec![6.0, 6.04, 5.9, 6.1]);
        assert_eq!(snap.history.estimated_15y, vec![5.6, 5.64, 5.5, 5.7]);
        assert_eq!(
            snap.history.actual_30y.unwrap().values(),
            vec![None, None, None, Some(6.93)]
        );
        assert_eq!(snap.history.inflation.unwrap().dates.len(), 13);
    }

    #[test]
    fn statistics_cover_the_yield_window() {
        let stats = assemble(&bundle(), spread(), 2, &NullSink).unwrap().statistics;

        assert_eq!(stats.range.min, 4.10);
        assert_eq!(stats.range.max, 4.30);
        assert_eq!(stats.range_position, 1.0);
        assert_eq!(stats.period_change, 0.0238);
        assert_eq!(
            stats.moving_average,
            vec![
                Observation::new(d(2025, 1, 7), 4.22),
                Observation::new(d(2025, 1, 8), 4.17),
                Observation::new(d(2025, 1, 9), 4.2),
            ]
        );
    }

    #[test]
    fn empty_treasury_is_fatal() {
        let mut b = bundle();
        b.set(Series::empty(Indicator::Treasury10Y));
        let err = assemble(&b, spread(), 2, &NullSink).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::FatalDataUnavailable {
                indicator: Indicator::Treasury10Y,
                ..
            }
        ));
    }

    #[test]
    fn missing_secondary_series_drop_their_blocks() {
        let mut b = bundle();
        b.set(Series::empty(Indicator::Mortgage15Y));
        b.set(Series::empty(Indicator::CorePce));

        let sink = RecordingSink::new();
        let snap = assemble(&b, spread(), 2, &sink).unwrap();

        assert!(snap.actual_30y.is_some());
        assert!(snap.actual_15y.is_none());
        assert!(snap.history.actual_15y.is_none());
        assert!(snap.inflation.is_none());
        assert!(snap.history.inflation.is_none());

        let unavailable: Vec<_> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DiagnosticEvent::SeriesUnavailable { indicator, .. } => Some(indicator),
                _ => None,
            })
            .collect();
        assert_eq!(unavailable, vec![Indicator::Mortgage15Y, Indicator::CorePce]);
    }

    #[test]
    fn gap_events_carry_series_and_label_cadence() {
        let mut b = bundle();
        // Core PCE is a month behind CPI.
        b.set(monthly(Indicator::CorePce, 12, 120.0));

        let sink = RecordingSink::new();
        assemble(&b, spread(), 2, &sink).unwrap();

        let gaps: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, DiagnosticEvent::AlignmentGaps { .. }))
            .collect();
        assert_eq!(
            gaps,
            vec![
                DiagnosticEvent::AlignmentGaps {
                    indicator: Indicator::Mortgage30Y,
                    cadence: Cadence::Weekly,
                    labels_cadence: Cadence::Daily,
                    labels: 4,
                    missing: 3,
                },
                DiagnosticEvent::AlignmentGaps {
                    indicator: Indicator::Mortgage15Y,
                    cadence: Cadence::Weekly,
                    labels_cadence: Cadence::Daily,
                    labels: 4,
                    missing: 3,
                },
                DiagnosticEvent::AlignmentGaps {
                    indicator: Indicator::CorePce,
                    cadence: Cadence::Monthly,
                    labels_cadence: Cadence::Monthly,
                    labels: 13,
                    missing: 1,
                },
            ]
        );
    }

    #[test]
    fn annual_rate_needs_ten_observations_and_a_year_of_history() {
        let mut b = bundle();
        b.set(monthly(Indicator::Cpi, 9, 300.0));
        let snap = assemble(&b, spread(), 2, &NullSink).unwrap();
        let inflation = snap.inflation.unwrap();
        assert_eq!(inflation.cpi.annual_rate, None);
        assert!(inflation.core_pce.annual_rate.is_some());

        // Twelve observations spanning only eleven months.
        b.set(monthly(Indicator::Cpi, 12, 300.0));
        let snap = assemble(&b, spread(), 2, &NullSink).unwrap();
        assert_eq!(snap.inflation.unwrap().cpi.annual_rate, None);
    }

    #[test]
    fn year_ago_picks_latest_on_or_before_target() {
        let s = series(
            Indicator::Cpi,
            &[
                (d(2023, 12, 15), 1.0),
                (d(2024, 1, 10), 2.0),
                (d(2024, 1, 20), 3.0),
                (d(2024, 3, 1), 4.0),
                (d(2024, 4, 1), 4.0),
                (d(2024, 5, 1), 4.0),
                (d(2024, 6, 1), 4.0),
                (d(2024, 8, 1), 4.0),
                (d(2024, 10, 1), 4.0),
                (d(2025, 1, 15), 5.0),
            ],
        );
        assert_eq!(year_ago(&s).unwrap().date, d(2024, 1, 10));
    }

    #[test]
    fn export_rows_follow_treasury_dates() {
        let snap = assemble(&bundle(), spread(), 2, &NullSink).unwrap();
        let rows = snap.export_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].actual_30y, None);
        assert_eq!(rows[3].actual_30y, Some(6.93));
        assert_eq!(rows[3].estimated_30y, 6.1);
    }
}
