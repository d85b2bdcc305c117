//! # ClimTrace — global surface temperature tracking
//!
//! A pipeline for turning annual global-mean surface temperature records
//! into smooth decadal trend estimates with propagated uncertainties, and
//! for reconciling future scenario trajectories with the observed record.
//!
//! ## What does it compute?
//!
//! The central product is a pair of annual series: the **decadal mean**
//! (the long-term anomaly level, free of year-to-year noise) and the
//! **decadal derivative** (the current rate of warming, in °C per year),
//! each with a total one-sigma uncertainty. Both are extended a few years
//! past the end of the observed data by curvature-based extrapolation with
//! a cosine-tapered flattening, so the most recent years (where a centered
//! smoother has no future data to lean on) still get defensible values.
//!
//! The smoother at the heart of the pipeline is an **ensemble of trends**:
//! at every year, weighted linear fits are computed for a whole family of
//! window widths around a core width, windows sliding inside the data range
//! near the edges, and the ensemble of fitted center values is averaged.
//! Compared with a single fixed-width moving fit this suppresses the
//! dependence of the result on one arbitrary width choice, and the spread
//! of the regression standard errors yields an honest uncertainty.
//!
//! On top of the smoother sit the scenario operations: SSP trajectory
//! tables are **anchored** to the observed record at a pivot year,
//! their derivatives **adjusted** to match the observed warming rate with
//! a fade-out back to the raw pathway, and GSAT tracks converted to GMST
//! by a fixed empirical ratio.
//!
//! ## Quick start
//!
//! ```rust
//! use climtrace::prelude::*;
//!
//! // A synthetic annual record: steady 0.12 °C/decade warming with a
//! // constant 0.05 °C observational uncertainty.
//! let years: Vec<i32> = (1940..=2023).collect();
//! let values: Vec<f64> = years.iter().map(|&y| 0.012 * f64::from(y - 1940)).collect();
//! let record = UncertainTimeSeries::new(
//!     TimeSeries::new(1940, values)?,
//!     TimeSeries::constant(1940, 2023, 0.05)?,
//! )?;
//!
//! let smoother = MovingWindowSmoother::new(SmootherConfig::default())?;
//! let output = smoother.run(&record)?;
//!
//! assert_eq!(output.decadal_mean.start(), 1960);
//! assert_eq!(output.decadal_mean.end(), 2023);
//! # Ok::<(), ClimTraceError>(())
//! ```
//!
//! ## Crate layout
//!
//! The crate is organized in strict layers; each layer depends only on the
//! ones below it.
//!
//! | Layer | Module | Contents |
//! |-------|--------|----------|
//! | 1 | [`primitives`] | `TimeSeries`, `UncertainTimeSeries`, errors |
//! | 2 | [`math`] | weighted least squares, window shapes, kernels |
//! | 3 | [`algorithms`] | the ensemble-of-trends filter |
//! | 4 | [`engine`] | input validation, the 7-stage smoother |
//! | 5 | [`scenarios`] | scenario tables, anchoring, adjustment |
//! | 6 | [`evaluation`] | rolling multi-decadal trend diagnostics |
//! | 7 | [`predictors`] | optional short-term signal removal |
//!
//! Configuration structs for the engine and scenario layers live in
//! [`config`].
//!
//! ## Determinism
//!
//! Every operation in this crate is a pure function of its inputs: no
//! randomness, no global state, no time-of-day dependence. Two runs over
//! the same input produce bit-identical output.

#![deny(missing_docs)]

// ============================================================================
// Modules
// ============================================================================

// Layer 1: Primitives - series containers and the crate error type.
pub mod primitives;

// Layer 2: Math - weighted least squares, window geometry, kernels.
pub mod math;

// Layer 3: Algorithms - the ensemble-of-trends filter.
pub mod algorithms;

// Layer 4: Engine - validation and the 7-stage smoother pipeline.
pub mod engine;

// Layer 5: Scenarios - trajectory tables, anchoring, adjustment.
pub mod scenarios;

// Layer 6: Evaluation - diagnostics over finished records.
pub mod evaluation;

// Layer 7: Predictors - short-term natural-variability removal.
pub mod predictors;

// Pipeline configuration structs.
pub mod config;

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types, intended to be wildcard-imported:
///
/// ```
/// use climtrace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algorithms::{EotFilter, EotOutput};
    pub use crate::config::{AdjustmentConfig, QuadraticCorrection, SmootherConfig};
    pub use crate::engine::{MovingWindowSmoother, SmootherOutput};
    pub use crate::evaluation::{rolling_trends, TrendConfig, TrendWindow};
    pub use crate::math::{wls_fit, WlsFit};
    pub use crate::predictors::{
        remove_short_term_signal, PreprocessConfig, RegressionOutcome, Regressor, RegressorKind,
    };
    pub use crate::primitives::{ClimTraceError, TimeSeries, UncertainTimeSeries};
    pub use crate::scenarios::{
        adjust_to_observations, anchor_to_observations, scenario_derivatives, AdjustedScenarios,
        Scenario, ScenarioTable,
    };
}
