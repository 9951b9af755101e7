//! End-to-end load and assembly against in-memory providers.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use rate_watch::app::pipeline;
use rate_watch::data::{SampleProvider, SeriesProvider};
use rate_watch::diagnostics::{DiagnosticEvent, NullSink, RecordingSink};
use rate_watch::domain::{Indicator, Observation, Series, SeriesRequest, Spread, TimeRange};
use rate_watch::error::{DashboardError, ProviderError};

/// Serves fixed observations; listed indicators fail.
#[derive(Default)]
struct StaticProvider {
    series: HashMap<Indicator, Vec<Observation>>,
    failing: HashSet<Indicator>,
}

impl StaticProvider {
    fn with(mut self, indicator: Indicator, observations: Vec<Observation>) -> Self {
        self.series.insert(indicator, observations);
        self
    }

    fn failing(mut self, indicator: Indicator) -> Self {
        self.failing.insert(indicator);
        self
    }
}

impl SeriesProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, request: &SeriesRequest) -> Result<Series, ProviderError> {
        if self.failing.contains(&request.indicator) {
            return Err(ProviderError::Status {
                indicator: request.indicator,
                status: 503,
            });
        }
        let observations = self
            .series
            .get(&request.indicator)
            .map(|obs| {
                obs.iter()
                    .filter(|o| request.start.is_none_or(|s| o.date >= s))
                    .filter(|o| request.end.is_none_or(|e| o.date <= e))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Series::new(request.indicator, observations))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn monthly(count: u32, start_level: f64) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let date = d(2025, 6, 1).checked_sub_months(Months::new(count - 1 - i)).unwrap();
            Observation::new(date, start_level + f64::from(i) * 0.5)
        })
        .collect()
}

fn full_provider() -> StaticProvider {
    StaticProvider::default()
        .with(
            Indicator::Treasury10Y,
            vec![
                Observation::new(d(2025, 6, 23), 4.35),
                Observation::new(d(2025, 6, 24), 4.30),
                Observation::new(d(2025, 6, 25), 4.29),
                Observation::new(d(2025, 6, 26), 4.26),
                Observation::new(d(2025, 6, 27), 4.28),
            ],
        )
        .with(
            Indicator::Mortgage30Y,
            vec![
                Observation::new(d(2025, 6, 19), 6.81),
                Observation::new(d(2025, 6, 26), 6.77),
            ],
        )
        .with(
            Indicator::Mortgage15Y,
            vec![
                Observation::new(d(2025, 6, 19), 5.96),
                Observation::new(d(2025, 6, 26), 5.89),
            ],
        )
        .with(Indicator::Cpi, monthly(14, 313.0))
        .with(Indicator::CorePce, monthly(14, 124.0))
}

fn spread(v: f64) -> Spread {
    Spread::new(v).unwrap()
}

#[test]
fn identical_inputs_give_identical_snapshots() {
    let provider = full_provider();
    let a = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap();
    let b = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap();
    assert_eq!(a.snapshot, b.snapshot);

    let again = pipeline::recompute(&a.bundle, spread(1.8), 3, &NullSink).unwrap();
    assert_eq!(again, a.snapshot);
}

#[test]
fn full_load_populates_every_block() {
    let out = pipeline::load(&full_provider(), TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap();
    let s = &out.snapshot;

    assert_eq!(s.as_of, d(2025, 6, 27));
    assert_eq!(s.treasury.current, 4.28);
    assert_eq!(s.treasury.delta, 0.02);
    assert_eq!(s.estimated.rate_30y, 6.08);
    assert_eq!(s.estimated.rate_15y, 5.68);
    assert_eq!(s.actual_30y.unwrap().delta, -0.04);
    assert_eq!(s.actual_15y.unwrap().current, 5.89);

    let inflation = s.inflation.unwrap();
    // 319.5 now vs 313.5 on 2024-06-01.
    assert_eq!(inflation.cpi.annual_rate, Some(1.91));
    assert!(inflation.core_pce.annual_rate.is_some());

    let actual = s.history.actual_30y.as_ref().unwrap();
    assert_eq!(actual.len(), 5);
    assert_eq!(actual.present(), 1);
    assert_eq!(s.export_rows()[3].actual_30y, Some(6.77));
}

#[test]
fn failed_secondary_series_only_drops_its_block() {
    let provider = full_provider().failing(Indicator::Cpi);
    let sink = RecordingSink::new();
    let out = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &sink).unwrap();

    assert!(out.snapshot.inflation.is_none());
    assert!(out.snapshot.history.inflation.is_none());
    assert!(out.snapshot.actual_30y.is_some());
    assert!(out.snapshot.actual_15y.is_some());
    assert_eq!(out.snapshot.history.treasury_10y.len(), 5);

    let cpi_unavailable = sink
        .events()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                DiagnosticEvent::SeriesUnavailable {
                    indicator: Indicator::Cpi,
                    ..
                }
            )
        })
        .count();
    // Once for the failed fetch, once when assembly finds the series empty.
    assert_eq!(cpi_unavailable, 2);
}

#[test]
fn empty_primary_series_is_fatal() {
    let provider = full_provider().with(Indicator::Treasury10Y, Vec::new());
    let err = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::FatalDataUnavailable {
            indicator: Indicator::Treasury10Y,
            ..
        }
    ));

    let provider = full_provider().failing(Indicator::Treasury10Y);
    let err = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[test]
fn annual_rate_requires_ten_observations() {
    let provider = full_provider().with(Indicator::Cpi, monthly(9, 313.0));
    let sink = RecordingSink::new();
    let out = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &sink).unwrap();

    let inflation = out.snapshot.inflation.unwrap();
    assert_eq!(inflation.cpi.annual_rate, None);
    assert!(inflation.core_pce.annual_rate.is_some());
    assert!(sink.events().iter().any(|e| matches!(
        e,
        DiagnosticEvent::AnnualRateSkipped {
            indicator: Indicator::Cpi,
            observations: 9,
            ..
        }
    )));
}

#[test]
fn spread_recompute_matches_fresh_load() {
    let provider = full_provider();
    let first = pipeline::load(&provider, TimeRange::TwoYears, spread(1.8), today(), 3, &NullSink).unwrap();
    let recomputed = pipeline::recompute(&first.bundle, spread(2.25), 3, &NullSink).unwrap();
    let fresh = pipeline::load(&provider, TimeRange::TwoYears, spread(2.25), today(), 3, &NullSink).unwrap();

    assert_eq!(recomputed, fresh.snapshot);
    assert_eq!(recomputed.estimated.rate_30y, 6.53);
    assert_eq!(recomputed.treasury, first.snapshot.treasury);
}

#[test]
fn narrower_range_trims_history() {
    let provider = full_provider();
    let out = pipeline::load(&provider, TimeRange::OneMonth, spread(1.8), today(), 3, &NullSink).unwrap();
    assert_eq!(out.snapshot.range, TimeRange::OneMonth);
    // Only the June CPI print falls inside one month.
    assert_eq!(out.bundle.cpi.len(), 1);
    assert_eq!(out.snapshot.inflation.unwrap().cpi.annual_rate, None);
}

#[test]
fn sample_provider_loads_are_reproducible() {
    let a = SampleProvider::new(99, today());
    let b = SampleProvider::new(99, today());
    let load = |p: &SampleProvider| {
        pipeline::load(p, TimeRange::FiveYears, Spread::default(), today(), 20, &NullSink).unwrap()
    };

    let (x, y) = (load(&a), load(&b));
    assert_eq!(x.snapshot, y.snapshot);
    assert!(x.snapshot.inflation.unwrap().cpi.annual_rate.is_some());
    assert_eq!(x.snapshot.statistics.moving_average.len(), x.snapshot.history.dates.len() - 19);
}

#[test]
fn one_year_range_reaches_the_year_ago_print_only_on_its_date() {
    let load_on = |today: NaiveDate, sink: &RecordingSink| {
        let provider = SampleProvider::new(7, today);
        pipeline::load(&provider, TimeRange::OneYear, Spread::default(), today, 20, sink).unwrap()
    };

    // The range starts on 2024-06-01, so last June's print is included.
    let sink = RecordingSink::new();
    let out = load_on(d(2025, 6, 1), &sink);
    assert_eq!(out.bundle.cpi.len(), 13);
    assert!(out.snapshot.inflation.unwrap().cpi.annual_rate.is_some());

    // Mid-month the range starts after that print.
    for today in [d(2025, 6, 15), d(2025, 6, 28)] {
        let sink = RecordingSink::new();
        let out = load_on(today, &sink);
        assert_eq!(out.bundle.cpi.len(), 12);
        assert_eq!(out.snapshot.inflation.unwrap().cpi.annual_rate, None);
        assert!(sink.events().iter().any(|e| matches!(
            e,
            DiagnosticEvent::AnnualRateSkipped {
                indicator: Indicator::Cpi,
                observations: 12,
                ..
            }
        )));
    }
}
