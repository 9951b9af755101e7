//! Seeded synthetic series for offline runs.
//!
//! The generated history has the same shape as the live data: business-day
//! Treasury yields, Thursday mortgage averages that track the yield plus a
//! lender markup, and first-of-month price indices with steady drift. Output
//! depends only on the seed and the anchor date, never on the requested
//! window, so narrowing the range returns a slice of the same history.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::provider::SeriesProvider;
use crate::domain::{Indicator, Observation, Series, SeriesRequest};
use crate::error::ProviderError;
use crate::math::round_to;

/// Years of history generated before the anchor date.
const HISTORY_YEARS: u32 = 12;

const TREASURY_LEVEL: f64 = 4.0;
const TREASURY_REVERSION: f64 = 0.01;
const TREASURY_DAILY_VOL: f64 = 0.05;
const TREASURY_FLOOR: f64 = 0.25;

const MORTGAGE_30Y_MARKUP: f64 = 1.75;
const MORTGAGE_15Y_DISCOUNT: f64 = 0.65;
const MORTGAGE_NOISE: f64 = 0.08;

const CPI_START: f64 = 230.0;
const CPI_MONTHLY_DRIFT: f64 = 0.0025;
const CORE_PCE_START: f64 = 105.0;
const CORE_PCE_MONTHLY_DRIFT: f64 = 0.0022;
const INDEX_NOISE: f64 = 0.001;

/// Golden-ratio increment used to spread per-indicator seeds apart.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic provider backed by generated data.
#[derive(Debug, Clone)]
pub struct SampleProvider {
    seed: u64,
    anchor: NaiveDate,
    unavailable: HashSet<Indicator>,
}

impl SampleProvider {
    /// `anchor` is the last date of generated history.
    pub fn new(seed: u64, anchor: NaiveDate) -> Self {
        Self {
            seed,
            anchor,
            unavailable: HashSet::new(),
        }
    }

    /// Make fetches for `indicator` fail, as an outage would.
    pub fn with_unavailable(mut self, indicator: Indicator) -> Self {
        self.unavailable.insert(indicator);
        self
    }

    fn history_start(&self) -> NaiveDate {
        self.anchor
            .checked_sub_months(Months::new(HISTORY_YEARS * 12))
            .unwrap_or(self.anchor)
    }

    fn generate(&self, indicator: Indicator) -> Result<Vec<Observation>, ProviderError> {
        let start = self.history_start();
        let noise = |indicator: Indicator, sd: f64| {
            Normal::new(0.0, sd).map_err(|e| ProviderError::Request {
                indicator,
                message: format!("noise distribution error: {e}"),
            })
        };

        match indicator {
            Indicator::Treasury10Y => {
                let mut rng = self.rng(Indicator::Treasury10Y);
                let step = noise(indicator, TREASURY_DAILY_VOL)?;
                Ok(treasury_path(&mut rng, &step, start, self.anchor))
            }
            Indicator::Mortgage30Y | Indicator::Mortgage15Y => {
                let mut treasury_rng = self.rng(Indicator::Treasury10Y);
                let step = noise(indicator, TREASURY_DAILY_VOL)?;
                let treasury = treasury_path(&mut treasury_rng, &step, start, self.anchor);

                let mut rng = self.rng(Indicator::Mortgage30Y);
                let jitter = noise(indicator, MORTGAGE_NOISE)?;
                let thirty = mortgage_path(&mut rng, &jitter, &treasury);
                if indicator == Indicator::Mortgage30Y {
                    return Ok(thirty);
                }

                let mut rng = self.rng(Indicator::Mortgage15Y);
                Ok(thirty
                    .iter()
                    .map(|o| {
                        let v = o.value - MORTGAGE_15Y_DISCOUNT + jitter.sample(&mut rng) * 0.5;
                        Observation::new(o.date, round_to(v, 2))
                    })
                    .collect())
            }
            Indicator::Cpi | Indicator::CorePce => {
                let (level, drift) = if indicator == Indicator::Cpi {
                    (CPI_START, CPI_MONTHLY_DRIFT)
                } else {
                    (CORE_PCE_START, CORE_PCE_MONTHLY_DRIFT)
                };
                let mut rng = self.rng(indicator);
                let jitter = noise(indicator, INDEX_NOISE)?;
                Ok(index_path(&mut rng, &jitter, level, drift, start, self.anchor))
            }
        }
    }

    fn rng(&self, indicator: Indicator) -> StdRng {
        StdRng::seed_from_u64(indicator_seed(self.seed, indicator))
    }
}

impl SeriesProvider for SampleProvider {
    fn name(&self) -> &str {
        "sample"
    }

    fn fetch(&self, request: &SeriesRequest) -> Result<Series, ProviderError> {
        if self.unavailable.contains(&request.indicator) {
            return Err(ProviderError::Request {
                indicator: request.indicator,
                message: "unavailable in sample data".to_string(),
            });
        }

        let observations = self
            .generate(request.indicator)?
            .into_iter()
            .filter(|o| request.start.is_none_or(|s| o.date >= s))
            .filter(|o| request.end.is_none_or(|e| o.date <= e))
            .collect();

        Ok(Series::new(request.indicator, observations))
    }
}

/// Per-indicator seed; fixed arithmetic so histories match across toolchains.
fn indicator_seed(seed: u64, indicator: Indicator) -> u64 {
    seed ^ (indicator as u64 + 1).wrapping_mul(SEED_MIX)
}

/// Mean-reverting random walk on weekdays.
fn treasury_path(
    rng: &mut StdRng,
    step: &Normal<f64>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut level = TREASURY_LEVEL;
    let mut date = start;
    while date <= end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            level += TREASURY_REVERSION * (TREASURY_LEVEL - level) + step.sample(rng);
            level = level.max(TREASURY_FLOOR);
            out.push(Observation::new(date, round_to(level, 2)));
        }
        let Some(next) = date.succ_opt() else {
            break;
        };
        date = next;
    }
    out
}

/// Thursday averages: that day's yield plus the lender markup.
fn mortgage_path(rng: &mut StdRng, jitter: &Normal<f64>, treasury: &[Observation]) -> Vec<Observation> {
    treasury
        .iter()
        .filter(|o| o.date.weekday() == Weekday::Thu)
        .map(|o| {
            let v = o.value + MORTGAGE_30Y_MARKUP + jitter.sample(rng);
            Observation::new(o.date, round_to(v, 2))
        })
        .collect()
}

/// First-of-month index compounding at `drift` with noise.
fn index_path(
    rng: &mut StdRng,
    jitter: &Normal<f64>,
    start_level: f64,
    drift: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut level = start_level;
    let Some(mut date) = NaiveDate::from_ymd_opt(start.year(), start.month(), 1) else {
        return out;
    };
    while date <= end {
        level *= 1.0 + drift + jitter.sample(rng);
        out.push(Observation::new(date, round_to(level, 3)));
        let Some(next) = date.checked_add_months(Months::new(1)) else {
            break;
        };
        date = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn request(indicator: Indicator, start: Option<NaiveDate>) -> SeriesRequest {
        SeriesRequest {
            indicator,
            start,
            end: None,
        }
    }

    #[test]
    fn same_seed_same_history() {
        let a = SampleProvider::new(7, d(2025, 6, 30));
        let b = SampleProvider::new(7, d(2025, 6, 30));
        let req = request(Indicator::Treasury10Y, Some(d(2025, 1, 1)));
        assert_eq!(a.fetch(&req).unwrap(), b.fetch(&req).unwrap());

        let c = SampleProvider::new(8, d(2025, 6, 30));
        assert_ne!(a.fetch(&req).unwrap(), c.fetch(&req).unwrap());
    }

    #[test]
    fn indicator_seeds_are_fixed_and_distinct() {
        assert_eq!(indicator_seed(42, Indicator::Treasury10Y), 42 ^ SEED_MIX);
        assert_eq!(indicator_seed(0, Indicator::Mortgage30Y), SEED_MIX.wrapping_mul(2));

        let seeds: HashSet<u64> = Indicator::ALL.iter().map(|&i| indicator_seed(7, i)).collect();
        assert_eq!(seeds.len(), Indicator::ALL.len());
    }

    #[test]
    fn narrower_window_is_a_slice_of_the_same_history() {
        let provider = SampleProvider::new(1, d(2025, 6, 30));
        let wide = provider
            .fetch(&request(Indicator::Mortgage30Y, Some(d(2024, 1, 1))))
            .unwrap();
        let narrow = provider
            .fetch(&request(Indicator::Mortgage30Y, Some(d(2025, 1, 1))))
            .unwrap();

        let tail: Vec<_> = wide
            .observations()
            .iter()
            .filter(|o| o.date >= d(2025, 1, 1))
            .copied()
            .collect();
        assert_eq!(narrow.observations(), tail.as_slice());
    }

    #[test]
    fn cadences_match_publication_schedules() {
        let provider = SampleProvider::new(3, d(2025, 6, 30));
        let start = Some(d(2025, 1, 1));

        let treasury = provider.fetch(&request(Indicator::Treasury10Y, start)).unwrap();
        assert!(treasury
            .observations()
            .iter()
            .all(|o| !matches!(o.date.weekday(), Weekday::Sat | Weekday::Sun)));

        let mortgage = provider.fetch(&request(Indicator::Mortgage15Y, start)).unwrap();
        assert!(!mortgage.is_empty());
        assert!(mortgage.observations().iter().all(|o| o.date.weekday() == Weekday::Thu));

        let cpi = provider.fetch(&request(Indicator::Cpi, start)).unwrap();
        assert_eq!(cpi.len(), 6);
        assert!(cpi.observations().iter().all(|o| o.date.day() == 1));
    }

    #[test]
    fn unavailable_indicator_fails() {
        let provider = SampleProvider::new(3, d(2025, 6, 30)).with_unavailable(Indicator::Cpi);
        assert!(provider.fetch(&request(Indicator::Cpi, None)).is_err());
        assert!(provider.fetch(&request(Indicator::CorePce, None)).is_ok());
    }
}
