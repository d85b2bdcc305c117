//! Rolling multi-decadal linear trend rates.
//!
//! ## Purpose
//!
//! Slides a fixed-length window (33 years by default, the classical
//! climate-normal span plus a transition year) across an annual record and
//! fits an ordinary least-squares line to each subperiod, reporting the
//! slope and its standard error scaled to °C per decade. Used to compare
//! the long-term record against independent datasets over recent decades.
//!
//! ## Non-goals
//!
//! * No gap handling: a NaN year inside a window makes that window's rate
//!   NaN rather than silently shortening the fit.

use num_traits::Float;

use crate::math::wls_fit;
use crate::primitives::{ClimTraceError, TimeSeries};

// ============================================================================
// Configuration
// ============================================================================

/// Parameters of the rolling trend computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    /// First year of the first window.
    pub start_year: i32,
    /// Last year of the last window (inclusive).
    pub end_year: i32,
    /// Window length, in years.
    pub window_years: usize,
    /// Slope scale factor; 10.0 converts °C/year to °C/decade.
    pub conversion_factor: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            start_year: 1991,
            end_year: 2023,
            window_years: 33,
            conversion_factor: 10.0,
        }
    }
}

// ============================================================================
// Rolling trends
// ============================================================================

/// One window's fitted trend rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendWindow<T> {
    /// First year of the window.
    pub first_year: i32,
    /// Last year of the window (inclusive).
    pub last_year: i32,
    /// Fitted slope, scaled by the conversion factor.
    pub rate: T,
    /// Standard error of the slope, same scale.
    pub rate_sigma: T,
}

/// Fit every `window_years`-long subperiod of `[start_year, end_year]`.
///
/// The series must cover the full evaluation range; windows are never
/// shortened at the edges.
pub fn rolling_trends<T: Float>(
    series: &TimeSeries<T>,
    config: &TrendConfig,
) -> Result<Vec<TrendWindow<T>>, ClimTraceError> {
    let window = config.window_years as i32;
    if window < 2 {
        return Err(ClimTraceError::InvalidConfig(format!(
            "trend window must span at least 2 years, got {}",
            config.window_years
        )));
    }
    if config.start_year + window - 1 > config.end_year {
        return Err(ClimTraceError::InvalidConfig(format!(
            "trend range {}..={} is shorter than the {}-year window",
            config.start_year, config.end_year, config.window_years
        )));
    }
    if !series.covers(config.start_year, config.end_year) {
        return Err(ClimTraceError::InsufficientCoverage {
            needed: (config.start_year, config.end_year),
            got: (series.start(), series.end()),
        });
    }

    let scale = T::from(config.conversion_factor).expect("conversion factor is representable");
    let weights = vec![T::one(); config.window_years];
    let abscissa: Vec<T> = (0..config.window_years)
        .map(|k| T::from(k).expect("window offset fits in float"))
        .collect();

    let mut windows = Vec::new();
    let mut first = config.start_year;
    while first + window - 1 <= config.end_year {
        let last = first + window - 1;
        let values: Vec<T> = (first..=last).map(|y| series.at_or_nan(y)).collect();
        let fit = wls_fit(&values, &abscissa, &weights)?;
        windows.push(TrendWindow {
            first_year: first,
            last_year: last,
            rate: fit.slope * scale,
            rate_sigma: fit.slope_stderr * scale,
        });
        first += 1;
    }
    Ok(windows)
}
