//! `rate-watch` library crate.
//!
//! The binary (`rates`) is a thin wrapper around this library so that:
//!
//! - loading and assembly are testable without spawning processes
//! - any front-end (CLI summary, TUI) shares one pipeline
//! - providers can be swapped (FRED, seeded sample data, test doubles)

pub mod align;
pub mod app;
pub mod cli;
pub mod data;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod snapshot;
pub mod tui;
