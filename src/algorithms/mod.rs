//! Layer 3: Algorithms (the ensemble-of-trends filter).
//!
//! The numerically delicate core: per-step multi-width local fits with
//! boundary extrapolation, aggregated into smoothed anomalies and
//! derivatives. The smoother in `engine` drives this filter twice per run.

pub mod eot;

pub use eot::{EotFilter, EotOutput};
