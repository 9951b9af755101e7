//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the indicator enumeration and its FRED series ids (`Indicator`)
//! - observations and series (`Observation`, `Series`, `AlignedPoint`)
//! - presentation-owned inputs (`Spread`, `TimeRange`)
//! - the resolved run configuration (`DashboardConfig`)

pub mod types;

pub use types::*;
