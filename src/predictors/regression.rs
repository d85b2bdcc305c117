//! Sequential single-predictor regression against a monthly record.
//!
//! ## Design notes
//!
//! * **Sequential fits**: predictors are regressed out one at a time, each
//!   fit consuming the previous residual. With near-orthogonal climate-mode
//!   indices this is equivalent to the joint fit and keeps every step a
//!   two-parameter problem.
//! * **Long-term protection**: the decadal curve is subtracted before any
//!   fit and added back to the residual, so the regression can only ever
//!   redistribute interannual variance.

use log::debug;
use num_traits::Float;

use crate::config::SmootherConfig;
use crate::engine::MovingWindowSmoother;
use crate::math::wls_fit;
use crate::predictors::monthly::{annual_means, hamming_smooth, stretch_annual_to_monthly};
use crate::predictors::Regressor;
use crate::primitives::{ClimTraceError, TimeSeries, UncertainTimeSeries};

// ============================================================================
// Configuration
// ============================================================================

/// Parameters of the short-term signal removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Centered Hamming smoothing width applied to the temperature record
    /// itself, in months; must be odd, 1 disables it.
    pub data_smoothing_months: usize,
    /// Configuration of the smoother that extracts the protected long-term
    /// curve. Its `data_end` and `end_year` must match the final complete
    /// year of the monthly record.
    pub trend: SmootherConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            data_smoothing_months: 1,
            trend: SmootherConfig {
                start_year: 1850,
                end_year: 2024,
                data_end: 2024,
                ..SmootherConfig::default()
            },
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// The result of removing short-term predictor signals from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionOutcome<T> {
    /// The record with fitted predictor signals removed and the long-term
    /// curve restored; indexed on the common overlap of all inputs.
    pub residual: TimeSeries<T>,
    /// The fitted short-term signal (what was removed), same index.
    pub fitted: TimeSeries<T>,
    /// Fraction of interannual variance explained by the predictors.
    pub r_squared: T,
}

// ============================================================================
// Regression
// ============================================================================

/// Regress the given predictor indices out of a monthly temperature record.
///
/// The record and every prepared predictor are cut to their common finite
/// overlap; an empty overlap is fatal. The long-term decadal curve never
/// participates in the fits.
pub fn remove_short_term_signal<T: Float>(
    data: &TimeSeries<T>,
    regressors: &[Regressor<T>],
    config: &PreprocessConfig,
) -> Result<RegressionOutcome<T>, ClimTraceError> {
    if regressors.is_empty() {
        return Err(ClimTraceError::InvalidConfig(
            "short-term signal removal needs at least one regressor".into(),
        ));
    }
    if config.data_smoothing_months % 2 == 0 {
        return Err(ClimTraceError::InvalidConfig(format!(
            "data smoothing width must be odd, got {}",
            config.data_smoothing_months
        )));
    }

    let smoothed = hamming_smooth(data, config.data_smoothing_months);

    // Long-term curve on annual means, stretched back onto the monthly
    // index between mid-year anchors.
    let annual = annual_means(&smoothed);
    let sigmas = TimeSeries::constant(annual.start(), annual.end(), T::zero())?;
    let trend = MovingWindowSmoother::new(config.trend)?
        .run(&UncertainTimeSeries::new(annual, sigmas)?)?;
    let curve = stretch_annual_to_monthly(
        &trend.decadal_mean,
        smoothed.start(),
        smoothed.end(),
    );
    let detrended = smoothed.zip_map(&curve, |d, c| d - c)?;

    // Cut everything to the common finite overlap.
    let prepared: Vec<TimeSeries<T>> = regressors.iter().map(|r| r.prepared()).collect();
    let mut lo = first_finite(&detrended);
    let mut hi = last_finite(&detrended);
    for series in &prepared {
        lo = lo.max(first_finite(series));
        hi = hi.min(last_finite(series));
    }
    if lo > hi {
        return Err(ClimTraceError::EmptyOverlap);
    }
    let detrended = detrended.restrict(lo, hi)?;

    // Sequential fits: each predictor is regressed against the running
    // residual of the previous ones.
    let weights = vec![T::one(); detrended.len()];
    let mut residual = detrended.clone();
    for (regressor, series) in regressors.iter().zip(&prepared) {
        let x = series.restrict(lo, hi)?;
        let fit = wls_fit(residual.values(), x.values(), &weights)?;
        debug!(
            "predictors: {} slope = {}",
            regressor.kind,
            fit.slope.to_f64().unwrap_or(f64::NAN)
        );
        residual = residual.zip_map(&x, |r, xi| r - fit.predict(xi))?;
    }

    let data_var = pow2(detrended.std_over(lo, hi));
    let resid_var = pow2(residual.std_over(lo, hi));
    let r_squared = (data_var - resid_var) / data_var;

    let fitted = detrended.zip_map(&residual, |d, r| d - r)?;
    let restored = residual.zip_map(&curve.restrict(lo, hi)?, |r, c| r + c)?;

    Ok(RegressionOutcome {
        residual: restored,
        fitted,
        r_squared,
    })
}

#[inline]
fn pow2<T: Float>(v: T) -> T {
    v * v
}

/// First index with a finite value, or `i32::MAX` if there is none.
fn first_finite<T: Float>(series: &TimeSeries<T>) -> i32 {
    series
        .iter()
        .find(|(_, v)| v.is_finite())
        .map(|(step, _)| step)
        .unwrap_or(i32::MAX)
}

/// Last index with a finite value, or `i32::MIN` if there is none.
fn last_finite<T: Float>(series: &TimeSeries<T>) -> i32 {
    let mut last = i32::MIN;
    for (step, v) in series.iter() {
        if v.is_finite() {
            last = step;
        }
    }
    last
}
