//! File output helpers.

pub mod export;
