//! Formatted terminal output for a dashboard snapshot.
//!
//! We keep formatting code in one place so:
//! - the assembly code stays clean and testable
//! - output changes are localized (the TUI reuses the same card text)

use crate::domain::Indicator;
use crate::math::FIFTEEN_YEAR_DISCOUNT;
use crate::report::Trend;
use crate::snapshot::{DashboardSnapshot, InflationReading, Reading};

/// Format the full dashboard: header, rate cards, inflation, statistics.
pub fn format_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    out.push_str("=== rates - Mortgage Rate Dashboard (FRED-based) ===\n");
    out.push_str(&format!(
        "As-of: {} | Range: {} | Spread: {}\n",
        snapshot.as_of,
        snapshot.range.label(),
        snapshot.spread
    ));

    out.push_str("\nRates:\n");
    out.push_str(&format_reading_line(
        Indicator::Treasury10Y.display_name(),
        &snapshot.treasury,
    ));
    out.push_str(&format!(
        "{:<18} {:>7.2}%  (10Y + {:.2})\n",
        "Est. 30-Year",
        snapshot.estimated.rate_30y,
        snapshot.spread.value()
    ));
    out.push_str(&format!(
        "{:<18} {:>7.2}%  (10Y + {:.2})\n",
        "Est. 15-Year",
        snapshot.estimated.rate_15y,
        snapshot.spread.value() - FIFTEEN_YEAR_DISCOUNT
    ));
    for (indicator, reading) in [
        (Indicator::Mortgage30Y, &snapshot.actual_30y),
        (Indicator::Mortgage15Y, &snapshot.actual_15y),
    ] {
        match reading {
            Some(r) => out.push_str(&format_reading_line(indicator.display_name(), r)),
            None => out.push_str(&format!("{:<18} {:>8}\n", indicator.display_name(), "n/a")),
        }
    }

    out.push_str("\nInflation:\n");
    match &snapshot.inflation {
        Some(block) => {
            out.push_str(&format_inflation_line(Indicator::Cpi.display_name(), &block.cpi));
            out.push_str(&format_inflation_line(
                Indicator::CorePce.display_name(),
                &block.core_pce,
            ));
        }
        None => out.push_str("  (unavailable)\n"),
    }

    let stats = &snapshot.statistics;
    out.push_str(&format!("\n10Y statistics (n={}):\n", snapshot.history.dates.len()));
    out.push_str(&format!(
        "- range: {:.2} .. {:.2} | position {:.3}\n",
        stats.range.min, stats.range.max, stats.range_position
    ));
    out.push_str(&format!("- volatility: {:.3}\n", stats.volatility));
    out.push_str(&format!("- period change: {}%\n", fmt_signed(stats.period_change * 100.0)));
    match stats.moving_average.last() {
        Some(ma) => out.push_str(&format!(
            "- {}-obs moving average: {:.2} ({})\n",
            stats.moving_average_window, ma.value, ma.date
        )),
        None => out.push_str(&format!(
            "- {}-obs moving average: n/a (too few observations)\n",
            stats.moving_average_window
        )),
    }

    out
}

/// One card line: name, current value, signed delta with arrow, prior value.
pub fn format_reading_line(name: &str, reading: &Reading) -> String {
    format!(
        "{:<18} {:>7.2}%  {} {}  (prev {:.2}, {})\n",
        name,
        reading.current,
        fmt_signed(reading.delta),
        Trend::of(reading.delta).arrow(),
        reading.previous,
        reading.date
    )
}

fn format_inflation_line(name: &str, inflation: &InflationReading) -> String {
    let r = &inflation.reading;
    format!(
        "{:<18} {:>9.3}  {}  annual {}  monthly {:.3}%  ({})\n",
        name,
        r.current,
        fmt_signed(r.delta),
        fmt_annual(inflation.annual_rate),
        inflation.monthly_rate,
        r.date
    )
}

pub fn fmt_annual(rate: Option<f64>) -> String {
    match rate {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}

pub fn fmt_signed(v: f64) -> String {
    if v > 0.0 { format!("+{v:.2}") } else { format!("{v:.2}") }
}
