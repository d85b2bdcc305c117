//! Layer 7: Predictors (short-term natural-variability removal).
//!
//! ## Purpose
//!
//! An optional pre-processing collaborator: given a monthly temperature
//! record and a set of climate-mode predictor indices (ENSO sea-surface
//! indices, the NAO index, stratospheric volcanic aerosol depth), regress
//! the short-term variability out of the record so the trend pipeline sees
//! a cleaner signal. The long-term curve is removed before the regression
//! and restored afterwards, so only interannual variance is at stake.
//!
//! ## Design notes
//!
//! * **Month-indexed series**: this layer reuses [`TimeSeries`] with the
//!   index `year·12 + month₀` instead of a plain year. Contiguity and NaN
//!   semantics carry over unchanged.
//! * **Per-regressor parameters**: the lag and smoothing width travel
//!   inside each [`Regressor`], so the parameter-count mismatches possible
//!   with parallel lists are unrepresentable.
//!
//! [`TimeSeries`]: crate::primitives::TimeSeries

use std::fmt::{Display, Formatter};

use num_traits::Float;

use crate::primitives::{ClimTraceError, TimeSeries};

pub mod monthly;
pub mod regression;

pub use monthly::{annual_means, hamming_smooth, month_index};
pub use regression::{remove_short_term_signal, PreprocessConfig, RegressionOutcome};

// ============================================================================
// RegressorKind
// ============================================================================

/// The recognized predictor indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegressorKind {
    /// Niño 3.4 SST index, ERSSTv5 (standardized).
    Nino34Ersst,
    /// Niño 3.4 SST index, HadISST.
    Nino34Hadisst,
    /// North Atlantic Oscillation index (NOAA CPC).
    NoaaNao,
    /// Stratospheric volcanic aerosol optical depth.
    VolcanicAod,
}

impl RegressorKind {
    /// Canonical short name.
    pub fn name(&self) -> &'static str {
        match self {
            RegressorKind::Nino34Ersst => "nino34_ersst",
            RegressorKind::Nino34Hadisst => "nino34_hadisst",
            RegressorKind::NoaaNao => "noaa_nao",
            RegressorKind::VolcanicAod => "volcanic_aod",
        }
    }
}

impl Display for RegressorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Regressor
// ============================================================================

/// One predictor index with its alignment parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Regressor<T> {
    /// Which index this is.
    pub kind: RegressorKind,
    /// The index values on a monthly index (`year·12 + month₀`).
    pub series: TimeSeries<T>,
    /// Months the index is shifted forward before regression (a positive
    /// lag makes the index lead the temperature response).
    pub lag_months: i32,
    /// Width of the centered Hamming smoothing window, in months; must be
    /// odd (1 disables smoothing).
    pub smoothing_months: usize,
}

impl<T: Float> Regressor<T> {
    /// Construct a regressor, rejecting an even smoothing width.
    pub fn new(
        kind: RegressorKind,
        series: TimeSeries<T>,
        lag_months: i32,
        smoothing_months: usize,
    ) -> Result<Self, ClimTraceError> {
        if smoothing_months % 2 == 0 {
            return Err(ClimTraceError::InvalidConfig(format!(
                "regressor '{kind}': smoothing width must be odd, got {smoothing_months}"
            )));
        }
        Ok(Self {
            kind,
            series,
            lag_months,
            smoothing_months,
        })
    }

    /// The index after lagging and smoothing, ready for alignment.
    pub(crate) fn prepared(&self) -> TimeSeries<T> {
        hamming_smooth(&self.series.shifted(self.lag_months), self.smoothing_months)
    }
}
