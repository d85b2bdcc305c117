//! Layer 1: Primitives (data structures and error types).
//!
//! Contains the fundamental series types ([`TimeSeries`],
//! [`UncertainTimeSeries`]) and the crate-wide error enum.

pub mod errors;
pub mod series;

pub use errors::ClimTraceError;
pub use series::{TimeSeries, UncertainTimeSeries};
