//! Series providers.
//!
//! - `fred`: live observations from the FRED API
//! - `sample`: seeded synthetic observations for offline runs

pub mod fred;
pub mod provider;
pub mod sample;

pub use fred::FredClient;
pub use provider::SeriesProvider;
pub use sample::SampleProvider;
