//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw fetched samples (`ObservedSample`, `ForecastSample`)
//! - merged chart points (`CombinedPoint`)
//! - the applied date filter (`DateRange`) and run configuration (`FetchConfig`)

pub mod types;

pub use types::*;
