//! Input validation for smoother configuration and data.
//!
//! ## Purpose
//!
//! This module provides the fail-fast validation that the smoother performs
//! before touching any numbers: configuration consistency, index coverage,
//! and uncertainty sanity.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **No silent partial results**: a precondition violation aborts the
//!   computation for the whole series.
//!
//! ## Non-goals
//!
//! * This module does not sort, transform, or filter input data.
//! * This module does not provide automatic correction of invalid inputs.
//! * This module does not perform the smoothing itself.

use num_traits::Float;

use crate::config::SmootherConfig;
use crate::primitives::{ClimTraceError, UncertainTimeSeries};

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for smoother configuration and input data.
///
/// All methods return `Result<(), ClimTraceError>` and fail fast upon
/// identifying the first violation.
pub struct Validator;

impl Validator {
    /// Validate internal consistency of a smoother configuration.
    pub fn validate_smoother_config(config: &SmootherConfig) -> Result<(), ClimTraceError> {
        if config.inner_half_width == 0 {
            return Err(ClimTraceError::InvalidConfig(
                "inner_half_width must be at least 1".into(),
            ));
        }
        if config.inner_half_width > config.outer_half_width {
            return Err(ClimTraceError::InvalidConfig(format!(
                "inner_half_width ({}) exceeds outer_half_width ({})",
                config.inner_half_width, config.outer_half_width
            )));
        }
        if config.start_year > config.data_end {
            return Err(ClimTraceError::InvalidConfig(format!(
                "start_year ({}) is after data_end ({})",
                config.start_year, config.data_end
            )));
        }
        if config.data_end > config.end_year {
            return Err(ClimTraceError::InvalidConfig(format!(
                "data_end ({}) is after end_year ({})",
                config.data_end, config.end_year
            )));
        }
        if config.flattening_start > config.data_end {
            return Err(ClimTraceError::InvalidConfig(format!(
                "flattening_start ({}) is after data_end ({})",
                config.flattening_start, config.data_end
            )));
        }
        Ok(())
    }

    /// Validate that the observed record covers what the configured filter
    /// range requires on both ends, and that the reliable core region is
    /// non-degenerate.
    ///
    /// `filter_start`/`core_start`/`core_end` are the derived years computed
    /// by the smoother for this particular input. A record beginning inside
    /// `[start_year − outer_half_width, start_year]` narrows the filter
    /// range rather than failing; one beginning after `start_year` cannot
    /// anchor the output index and is rejected.
    pub fn validate_observations<T: Float>(
        obs: &UncertainTimeSeries<T>,
        filter_start: i32,
        core_start: i32,
        core_end: i32,
        data_end: i32,
    ) -> Result<(), ClimTraceError> {
        if obs.values.start() > filter_start || obs.values.end() < data_end {
            return Err(ClimTraceError::InsufficientCoverage {
                needed: (filter_start, data_end),
                got: (obs.values.start(), obs.values.end()),
            });
        }
        if core_end <= core_start {
            return Err(ClimTraceError::InvalidConfig(format!(
                "reliable core region is empty ({core_start}..={core_end}); \
                 the observed record is too short for the configured windows"
            )));
        }
        Ok(())
    }

    /// Validate that the flattening year does not precede the reliable core
    /// end for this input (the stage-3 extension fills the years between).
    pub fn validate_flattening(
        flattening_start: i32,
        core_end: i32,
    ) -> Result<(), ClimTraceError> {
        if flattening_start < core_end {
            return Err(ClimTraceError::InvalidConfig(format!(
                "flattening_start ({flattening_start}) precedes the reliable \
                 core end ({core_end})"
            )));
        }
        Ok(())
    }
}
