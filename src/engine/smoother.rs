//! The 7-stage moving-window smoother.
//!
//! ## Purpose
//!
//! This module orchestrates the full trend pipeline: EOT filtering of the
//! observed record, derivative extraction, curvature-based extension past the
//! data end, cosine-tapered flattening, and uncertainty propagation through
//! every stage, producing the decadal-mean and decadal-derivative series with
//! their total one-sigma uncertainties.
//!
//! ## Design notes
//!
//! * **Strict stage order**: each stage's output is the next stage's input;
//!   no stage reads ahead or back across the boundary.
//! * **Pure**: running the pipeline twice on identical input yields
//!   bit-identical output. All state lives in locals.
//! * **NaN discipline**: reindexing introduces NaN for uninitialized years;
//!   the boxcar filter and the extension loops never push NaN into defined
//!   regions.
//!
//! ## Key concepts
//!
//! * **Reliable core**: the year range where the full ensemble of candidate
//!   windows is data-covered; everything outside it is extension.
//! * **Extension uncertainty**: grows linearly with distance from the core
//!   end at the observed year-to-year variability of the curvature.
//!
//! ## Invariants
//!
//! * Output series are indexed exactly `[start_year, end_year]`.
//! * Total uncertainties combine independent sources by root-sum-square.

use log::{debug, warn};
use num_traits::Float;

use crate::algorithms::EotFilter;
use crate::config::SmootherConfig;
use crate::engine::validator::Validator;
use crate::primitives::{ClimTraceError, TimeSeries, UncertainTimeSeries};

/// Phase angles (degrees) of the cosine taper that flattens the extended
/// trend; after the fifth extension year the derivative is held constant.
const TAPER_PHASES_DEG: [f64; 5] = [30.0, 60.0, 90.0, 120.0, 150.0];

// ============================================================================
// Output
// ============================================================================

/// The four series produced by one smoother run, indexed
/// `[start_year, end_year]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SmootherOutput<T> {
    /// Long-term anomaly level (decadal mean).
    pub decadal_mean: TimeSeries<T>,
    /// Long-term rate of change (decadal derivative), °C per year.
    pub decadal_derivative: TimeSeries<T>,
    /// Total one-sigma uncertainty of the decadal mean.
    pub mean_sigma: TimeSeries<T>,
    /// Total one-sigma uncertainty of the decadal derivative.
    pub derivative_sigma: TimeSeries<T>,
}

// ============================================================================
// Derived geometry
// ============================================================================

/// Year geometry derived from the configuration and a concrete input series.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    filter_start: i32,
    filter_end: i32,
    core_start: i32,
    core_end: i32,
    core_full: usize,
    inner_full: usize,
    jitter_hw: usize,
}

impl Geometry {
    fn derive(config: &SmootherConfig, data_start: i32) -> Self {
        let data_start = data_start.min(config.start_year);
        let filter_start = (config.start_year - config.outer_half_width as i32).max(data_start);
        let filter_end = config.data_end;
        let core_hw = config.core_half_width_years();
        Self {
            filter_start,
            filter_end,
            core_start: filter_start + core_hw,
            core_end: filter_end - core_hw,
            core_full: config.core_full_width(),
            inner_full: config.inner_full_width(),
            jitter_hw: config.jitter_half_width(),
        }
    }
}

// ============================================================================
// MovingWindowSmoother
// ============================================================================

/// Orchestrates the 7-stage pipeline over one observed annual record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingWindowSmoother {
    config: SmootherConfig,
}

impl MovingWindowSmoother {
    /// Create a smoother, validating the configuration.
    pub fn new(config: SmootherConfig) -> Result<Self, ClimTraceError> {
        Validator::validate_smoother_config(&config)?;
        Ok(Self { config })
    }

    /// The validated configuration.
    #[inline]
    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Run the pipeline over one annual observed record with its
    /// observational one-sigma uncertainty.
    ///
    /// The input must be annual means on an integer-year index; monthly data
    /// must be aggregated by the caller first.
    pub fn run<T: Float>(
        &self,
        obs: &UncertainTimeSeries<T>,
    ) -> Result<SmootherOutput<T>, ClimTraceError> {
        let cfg = &self.config;
        let geo = Geometry::derive(cfg, obs.values.start());
        Validator::validate_observations(
            obs,
            geo.filter_start,
            geo.core_start,
            geo.core_end,
            cfg.data_end,
        )?;
        Validator::validate_flattening(cfg.flattening_start, geo.core_end)?;

        let half = T::from(0.5).expect("0.5 is representable");
        let quarter = T::from(0.25).expect("0.25 is representable");

        // ====================================================================
        // Stage 1: core filtering
        // ====================================================================

        let windowed = obs.restrict(geo.filter_start, geo.filter_end)?;

        let ensemble = EotFilter::new(geo.core_full, geo.core_full - geo.inner_full)?;
        let eot = ensemble.run(&windowed.values)?;

        // Combine the filter's anomaly uncertainty with the observational
        // uncertainty, then knock down residual jitter with a short boxcar.
        let mut x = eot.anomaly.boxcar_update(geo.jitter_hw);
        let mut x_sigma = eot
            .anomaly_sigma
            .rss_with(&windowed.sigmas)?
            .boxcar_update(geo.jitter_hw);

        // ====================================================================
        // Stage 2: derivative extraction
        // ====================================================================

        // A zero width-range run is a single-window moving fit at the core
        // width; its uncertainty is discarded (stage 1's is kept instead).
        let single = EotFilter::new(geo.core_full, 0)?;
        let dx_core = single.run(&x)?.derivative;

        // ====================================================================
        // Stage 3: curvature-based extension
        // ====================================================================

        let cx = dx_core.diff();
        let mean_cx = cx.mean_over(geo.core_end - geo.core_full as i32 + 1, geo.core_end);
        debug!(
            "smoother: mean curvature over core tail = {}",
            mean_cx.to_f64().unwrap_or(f64::NAN)
        );
        if !mean_cx.is_finite() {
            warn!(
                "smoother: curvature undefined over the core tail \
                 ({}..={}); the extension will be NaN",
                geo.core_end - geo.core_full as i32 + 1,
                geo.core_end
            );
        }

        let mut dx = dx_core.reindex(geo.filter_start, cfg.flattening_start)?;
        let dx_base = dx.at_or_nan(geo.core_end);
        for (k, year) in (geo.core_end + 1..=cfg.flattening_start).enumerate() {
            let steps = T::from(k + 1).expect("extension step fits in float");
            dx.set(year, dx_base + mean_cx * steps);
        }

        let mut dx_sigma = eot.derivative_sigma;
        let dx_sigma_hold = dx_sigma.at_or_nan(geo.core_end);
        for year in geo.core_end + 1..=cfg.flattening_start {
            dx_sigma.set(year, dx_sigma_hold);
        }

        // ====================================================================
        // Stage 4: uncertainty widening
        // ====================================================================

        // Relative observational noise, capped at 25% of the derivative's own
        // magnitude; only defined up to the flattening year.
        let mut widened = Vec::with_capacity(dx_sigma.len());
        for (year, se) in dx_sigma.iter() {
            let d = dx.at_or_nan(year);
            let rel = (x_sigma.at_or_nan(year) / x.at_or_nan(year)).abs() * d.abs();
            let term = nan_min(rel, quarter * d.abs());
            widened.push((se * se + term * term).sqrt());
        }
        dx_sigma = TimeSeries::new(dx_sigma.start(), widened)?;

        dx = dx.boxcar_update(geo.jitter_hw);
        dx_sigma = dx_sigma.boxcar_update(geo.jitter_hw);

        // ====================================================================
        // Stage 5: cosine-tapered extrapolation
        // ====================================================================

        dx = dx.reindex(geo.filter_start, cfg.end_year)?;
        dx_sigma = dx_sigma.reindex(geo.filter_start, cfg.end_year)?;

        for (i, year) in (cfg.flattening_start + 1..=cfg.end_year).enumerate() {
            let prev = dx.at_or_nan(year - 1);
            if let Some(&phase) = TAPER_PHASES_DEG.get(i) {
                let damp =
                    T::from(0.5 * (1.0 + phase.to_radians().cos())).expect("damp is representable");
                dx.set(year, prev + mean_cx * damp);
            } else {
                dx.set(year, prev);
            }
            dx_sigma.set(year, dx_sigma.at_or_nan(year - 1));
        }

        // ====================================================================
        // Stage 6: extension-uncertainty growth
        // ====================================================================

        let cx_start = (geo.core_start + 1).max(cfg.curvature_reference_start);
        let cx_sdev = cx.std_over(cx_start + 1, geo.core_end);
        debug!(
            "smoother: curvature std-dev over {}..={} = {}",
            cx_start + 1,
            geo.core_end,
            cx_sdev.to_f64().unwrap_or(f64::NAN)
        );
        if !cx_sdev.is_finite() {
            warn!("smoother: curvature variability undefined; extension sigma will be NaN");
        }

        let mut ext_dx_sigma = TimeSeries::zeros(geo.filter_start, cfg.end_year)?;
        for (k, year) in (geo.core_end..=cfg.end_year).enumerate() {
            let elapsed = T::from(k).expect("elapsed years fit in float");
            ext_dx_sigma.set(year, elapsed * cx_sdev);
        }
        let total_dx_sigma = dx_sigma.rss_with(&ext_dx_sigma)?;

        // ====================================================================
        // Stage 7: anomaly reconstruction
        // ====================================================================

        x = x.reindex(geo.filter_start, cfg.end_year)?;
        for year in geo.core_end + 1..=cfg.end_year {
            let step = half * (dx.at_or_nan(year - 1) + dx.at_or_nan(year));
            x.set(year, x.at_or_nan(year - 1) + step);
        }

        x_sigma = x_sigma.reindex(geo.filter_start, cfg.end_year)?;
        let x_sigma_hold = x_sigma.at_or_nan(geo.core_end);
        for year in geo.core_end + 1..=cfg.end_year {
            x_sigma.set(year, x_sigma_hold);
        }

        let mut ext_x_sigma = TimeSeries::zeros(geo.filter_start, cfg.end_year)?;
        for year in geo.core_end + 1..=cfg.end_year {
            let step = half * (ext_dx_sigma.at_or_nan(year - 1) + ext_dx_sigma.at_or_nan(year));
            ext_x_sigma.set(year, ext_x_sigma.at_or_nan(year - 1) + step);
        }
        let total_x_sigma = ext_x_sigma.rss_with(&x_sigma.fill_nan(T::zero()))?;

        Ok(SmootherOutput {
            decadal_mean: x.reindex(cfg.start_year, cfg.end_year)?,
            decadal_derivative: dx.reindex(cfg.start_year, cfg.end_year)?,
            mean_sigma: total_x_sigma.reindex(cfg.start_year, cfg.end_year)?,
            derivative_sigma: total_dx_sigma.reindex(cfg.start_year, cfg.end_year)?,
        })
    }
}

/// Minimum that propagates NaN (unlike `Float::min`, which prefers the
/// non-NaN operand).
#[inline]
fn nan_min<T: Float>(a: T, b: T) -> T {
    if a.is_nan() || b.is_nan() {
        T::nan()
    } else {
        a.min(b)
    }
}
