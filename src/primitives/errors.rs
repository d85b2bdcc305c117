//! Error types for ClimTrace operations.
//!
//! ## Purpose
//!
//! This module defines every error condition that can occur while building
//! series, running the EOT filter and smoother, or adjusting scenarios.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (year, scenario,
//!   lengths) so the failing series/stage can be identified from the message.
//! * **Fatal by design**: All inputs are deterministic historical data, so an
//!   error indicates a data or configuration defect, never a transient
//!   condition. There is no retry path.
//! * **Per-column isolation**: Degenerate numeric cases (zero pivot
//!   derivative) name the affected scenario; other columns are unaffected.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery or fallback strategies.

use std::error::Error;
use std::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for ClimTrace operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ClimTraceError {
    /// A series was constructed or sliced down to zero points.
    EmptySeries,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// Year/value pairs must form a contiguous, strictly increasing index.
    NonContiguousIndex {
        /// Step expected from the previous entry.
        expected: i32,
        /// Step actually found.
        got: i32,
    },

    /// Value and uncertainty series must share one index exactly.
    MismatchedIndex {
        /// Index range of the value series.
        values: (i32, i32),
        /// Index range of the sigma series.
        sigmas: (i32, i32),
    },

    /// One-sigma uncertainties must be non-negative.
    NegativeUncertainty {
        /// Step at which the negative sigma was found.
        step: i32,
        /// The offending sigma.
        sigma: f64,
    },

    /// Number of points is below the minimum required for the operation.
    TooFewPoints {
        /// Number of points provided.
        got: usize,
        /// Minimum required points.
        min: usize,
    },

    /// Regression input arrays must have matching lengths.
    MismatchedInputs {
        /// Length of the response array.
        y_len: usize,
        /// Length of the explanatory array.
        x_len: usize,
        /// Length of the weights array.
        w_len: usize,
    },

    /// All regression weights are zero; the fit is undefined.
    ZeroWeightSum,

    /// The explanatory variable is constant; the design matrix is singular.
    DegenerateDesign,

    /// EOT window configuration does not produce a valid fit ensemble.
    InvalidWindowEnsemble {
        /// Central window width.
        core_width: usize,
        /// Spread of candidate widths around the core.
        width_range: usize,
    },

    /// Series does not cover the range the operation requires.
    InsufficientCoverage {
        /// First step required.
        needed: (i32, i32),
        /// Range actually covered by the series.
        got: (i32, i32),
    },

    /// Smoother/adjustment configuration violates an internal constraint.
    InvalidConfig(String),

    /// The observed series has no usable value at a required year.
    MissingObservation {
        /// Year at which the observation is required.
        year: i32,
    },

    /// A scenario column has no usable value at a required year.
    MissingScenarioValue {
        /// Name of the scenario column.
        scenario: &'static str,
        /// Year at which the value is required.
        year: i32,
    },

    /// A scenario's derivative at the pivot year is zero; the relative
    /// adjustment factor is undefined for that column.
    ZeroPivotDerivative {
        /// Name of the scenario column.
        scenario: &'static str,
        /// Pivot year.
        year: i32,
    },

    /// Scenario columns must share one time index.
    MismatchedScenarioIndex {
        /// Name of the offending scenario column.
        scenario: &'static str,
        /// Index range of the table.
        expected: (i32, i32),
        /// Index range of the offending column.
        got: (i32, i32),
    },

    /// No common time period remains after aligning data and regressors.
    EmptyOverlap,
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for ClimTraceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptySeries => write!(f, "Series contains no points"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::NonContiguousIndex { expected, got } => {
                write!(f, "Non-contiguous index: expected step {expected}, got {got}")
            }
            Self::MismatchedIndex { values, sigmas } => {
                write!(
                    f,
                    "Index mismatch: values cover {}..={}, sigmas cover {}..={}",
                    values.0, values.1, sigmas.0, sigmas.1
                )
            }
            Self::NegativeUncertainty { step, sigma } => {
                write!(f, "Negative uncertainty at step {step}: {sigma}")
            }
            Self::TooFewPoints { got, min } => {
                write!(f, "Too few points: got {got}, need at least {min}")
            }
            Self::MismatchedInputs { y_len, x_len, w_len } => {
                write!(
                    f,
                    "Length mismatch: y has {y_len} points, x has {x_len}, weights has {w_len}"
                )
            }
            Self::ZeroWeightSum => write!(f, "All regression weights are zero"),
            Self::DegenerateDesign => {
                write!(f, "Explanatory variable is constant; design matrix is singular")
            }
            Self::InvalidWindowEnsemble {
                core_width,
                width_range,
            } => {
                write!(
                    f,
                    "Invalid window ensemble: core width {core_width}, range {width_range} \
                     (smallest width must be at least 2)"
                )
            }
            Self::InsufficientCoverage { needed, got } => {
                write!(
                    f,
                    "Insufficient coverage: need {}..={}, series covers {}..={}",
                    needed.0, needed.1, got.0, got.1
                )
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::MissingObservation { year } => {
                write!(f, "Observed series has no value at year {year}")
            }
            Self::MissingScenarioValue { scenario, year } => {
                write!(f, "Scenario '{scenario}' has no value at year {year}")
            }
            Self::ZeroPivotDerivative { scenario, year } => {
                write!(
                    f,
                    "Scenario '{scenario}' has zero derivative at pivot year {year}; \
                     adjustment factor is undefined"
                )
            }
            Self::MismatchedScenarioIndex {
                scenario,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Scenario '{scenario}' covers {}..={}, table covers {}..={}",
                    got.0, got.1, expected.0, expected.1
                )
            }
            Self::EmptyOverlap => {
                write!(f, "Data and regressors share no common time period")
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for ClimTraceError {}
