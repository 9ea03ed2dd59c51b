//! The time-series alignment core.
//!
//! Everything in here is pure and synchronous: timestamp normalization,
//! the observed/forecast merge, date-range bounds, tick formatting, and the
//! renderer-agnostic display configuration. No I/O happens in this module,
//! which keeps the whole core unit-testable without a server.

pub mod display;
pub mod format;
pub mod merge;
pub mod normalize;
pub mod range;
