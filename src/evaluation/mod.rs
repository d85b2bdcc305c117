//! Layer 6: Evaluation (diagnostics computed over finished records).
//!
//! Everything here consumes pipeline output (or any comparable annual
//! record) read-only; nothing in this layer feeds back into the pipeline.

pub mod trends;

pub use trends::{rolling_trends, TrendConfig, TrendWindow};
