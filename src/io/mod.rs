//! Output helpers.
//!
//! - dated history export to CSV (`export`)
//! - full snapshot export to JSON (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
