//! Data sources: the demand REST API and the offline synthetic generator.

pub mod api;
pub mod sample;

pub use api::DemandClient;
pub use sample::generate_sample;
