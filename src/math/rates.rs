//! Rate estimates and point-to-point changes.
//!
//! All inputs and outputs are in percentage points except `percent_change`,
//! which returns a fraction (`0.0118` == 1.18%).

use super::rounding::{round2, round3, round4};

/// Historical gap between the 30-year and 15-year fixed mortgage spreads.
pub const FIFTEEN_YEAR_DISCOUNT: f64 = 0.4;

/// Estimated 30-year mortgage rate: the 10-year yield plus the lender spread.
pub fn estimate_rate(treasury_yield: f64, spread: f64) -> f64 {
    round2(treasury_yield + spread)
}

/// Estimated 15-year mortgage rate: the 30-year spread less `FIFTEEN_YEAR_DISCOUNT`.
pub fn estimate_15_year_rate(treasury_yield: f64, spread: f64) -> f64 {
    round2(treasury_yield + (spread - FIFTEEN_YEAR_DISCOUNT))
}

pub fn delta(current: f64, previous: f64) -> f64 {
    round2(current - previous)
}

/// Fractional change from `previous`; `0` when `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    round4((current - previous) / previous)
}

/// Year-over-year index change in percent; `0` when `year_ago` is zero.
pub fn annual_inflation_rate(current_index: f64, year_ago_index: f64) -> f64 {
    if year_ago_index == 0.0 {
        return 0.0;
    }
    round2(((current_index - year_ago_index) / year_ago_index) * 100.0)
}

/// Month-over-month index change in percent; `0` when `previous_month` is zero.
pub fn monthly_inflation_rate(current_index: f64, previous_month_index: f64) -> f64 {
    if previous_month_index == 0.0 {
        return 0.0;
    }
    round3(((current_index - previous_month_index) / previous_month_index) * 100.0)
}
