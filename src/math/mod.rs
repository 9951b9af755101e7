//! Numeric transform library.
//!
//! Small, pure functions over plain `f64` values and slices. Every rounded
//! result goes through `round_to`, so chained calculations agree on a single
//! rounding convention.

pub mod rates;
pub mod rounding;
pub mod stats;

pub use rates::*;
pub use rounding::*;
pub use stats::*;
