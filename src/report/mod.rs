//! Reporting utilities: movement direction and formatted terminal output.

pub mod format;

pub use format::*;

/// Direction of a change between two readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Trend::Up
        } else if delta < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "^",
            Trend::Down => "v",
            Trend::Flat => "=",
        }
    }
}
