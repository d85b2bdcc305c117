//! Ensemble-of-trends (EOT) filter.
//!
//! ## Purpose
//!
//! For every step of a series, this filter computes a family of local linear
//! fits whose windows differ only in width, then aggregates them into a
//! smoothed anomaly, a derivative estimate, and one-sigma uncertainties for
//! both.
//!
//! ## Key concepts
//!
//! * **Width ensemble**: fits are computed for every width in
//!   `[core − range, core + range]`. The anomaly at a step is the mean of
//!   each fit's center-year value; the derivative is taken from the central
//!   width only.
//! * **Boundary extrapolation**: windows that would extend past a boundary
//!   are shifted flush with it and the center value is extrapolated along
//!   the fitted line (see [`WindowPlacement`]).
//! * **Derivative validity**: the derivative (and its sigma) is only defined
//!   where the central window is fully data-covered; outside that region it
//!   is NaN.
//!
//! ## Invariants
//!
//! * Output series share the input index exactly.
//! * A NaN anywhere in a fit window yields NaN aggregates for that step,
//!   never an error; NaN marks "undefined", not "invalid".

use log::debug;
use num_traits::Float;

use crate::math::{wls_fit, WindowPlacement, WindowShape};
use crate::primitives::{ClimTraceError, TimeSeries};

// ============================================================================
// EotOutput
// ============================================================================

/// The four series produced by one filter run, on the input index.
#[derive(Debug, Clone, PartialEq)]
pub struct EotOutput<T> {
    /// Smoothed anomaly (mean of per-width center values).
    pub anomaly: TimeSeries<T>,
    /// Central-width slope; NaN outside the fully covered region.
    pub derivative: TimeSeries<T>,
    /// One-sigma anomaly uncertainty (mean of per-width combined errors).
    pub anomaly_sigma: TimeSeries<T>,
    /// One-sigma derivative uncertainty (RMS of per-width slope errors);
    /// NaN wherever the derivative is NaN.
    pub derivative_sigma: TimeSeries<T>,
}

// ============================================================================
// EotFilter
// ============================================================================

/// Configuration of one ensemble-of-trends filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EotFilter {
    core_width: usize,
    width_range: usize,
}

impl EotFilter {
    /// Configure a filter with the given central window width and width
    /// spread.
    ///
    /// With `width_range = 0` the filter degenerates to a single moving
    /// window fit at the core width.
    pub fn new(core_width: usize, width_range: usize) -> Result<Self, ClimTraceError> {
        if width_range + 2 > core_width {
            return Err(ClimTraceError::InvalidWindowEnsemble {
                core_width,
                width_range,
            });
        }
        Ok(Self {
            core_width,
            width_range,
        })
    }

    /// The candidate window widths, smallest first.
    pub fn widths(&self) -> impl Iterator<Item = usize> {
        (self.core_width - self.width_range)..=(self.core_width + self.width_range)
    }

    /// Largest number of points any candidate window can require.
    fn max_window_points(&self) -> usize {
        let w = self.core_width + self.width_range;
        if w % 2 == 0 {
            w + 1
        } else {
            w
        }
    }

    /// Run the filter over `series`.
    pub fn run<T: Float>(&self, series: &TimeSeries<T>) -> Result<EotOutput<T>, ClimTraceError> {
        let min_points = self.max_window_points();
        if series.len() < min_points {
            return Err(ClimTraceError::TooFewPoints {
                got: series.len(),
                min: min_points,
            });
        }

        debug!(
            "eot filter: widths {}..={} over {}..={}",
            self.core_width - self.width_range,
            self.core_width + self.width_range,
            series.start(),
            series.end()
        );

        let first = series.start();
        let last = series.end();
        let n_widths = T::from(2 * self.width_range + 1).expect("width count fits in float");
        // The central width equals the configured core width (the ensemble is
        // symmetric around it); the derivative is trusted only where this
        // window is fully covered.
        let deriv_margin = (self.core_width / 2) as i32;

        let mut anomaly = Vec::with_capacity(series.len());
        let mut derivative = Vec::with_capacity(series.len());
        let mut anomaly_sigma = Vec::with_capacity(series.len());
        let mut derivative_sigma = Vec::with_capacity(series.len());

        for i in first..=last {
            let mut center_sum = T::zero();
            let mut anom_sigma_sum = T::zero();
            let mut slope_err_sq_sum = T::zero();
            let mut central_slope = T::nan();

            for width in self.widths() {
                let shape = WindowShape::<T>::for_width(width)?;
                let delta = shape.half_width;
                let placement = WindowPlacement::resolve(i, delta, first, last);
                let j = placement.fit_center(i);

                let y: Vec<T> = (j - delta..=j + delta)
                    .map(|s| series.at_or_nan(s))
                    .collect();
                let fit = wls_fit(&y, &shape.abscissa(), &shape.weights)?;

                let offset =
                    T::from(placement.extrapolation_offset(i)).expect("offset fits in float");
                center_sum = center_sum + fit.predict(offset);

                // First-order propagation of the combined slope + intercept
                // error across half the window span.
                let half_span =
                    T::from(shape.points().div_ceil(2)).expect("span fits in float");
                let combined = (fit.slope_stderr * fit.slope_stderr * half_span * half_span
                    + fit.intercept_stderr * fit.intercept_stderr)
                    .sqrt();
                anom_sigma_sum = anom_sigma_sum + combined;
                slope_err_sq_sum = slope_err_sq_sum + fit.slope_stderr * fit.slope_stderr;

                if width == self.core_width {
                    central_slope = fit.slope;
                }
            }

            anomaly.push(center_sum / n_widths);
            anomaly_sigma.push(anom_sigma_sum / n_widths);

            if i >= first + deriv_margin && i <= last - deriv_margin {
                derivative.push(central_slope);
                derivative_sigma.push((slope_err_sq_sum / n_widths).sqrt());
            } else {
                derivative.push(T::nan());
                derivative_sigma.push(T::nan());
            }
        }

        Ok(EotOutput {
            anomaly: TimeSeries::new(first, anomaly)?,
            derivative: TimeSeries::new(first, derivative)?,
            anomaly_sigma: TimeSeries::new(first, anomaly_sigma)?,
            derivative_sigma: TimeSeries::new(first, derivative_sigma)?,
        })
    }
}
