//! Explicit pipeline configuration.
//!
//! ## Purpose
//!
//! Every empirical constant of the pipeline (reference years, window
//! half-widths, the pivot year, the GSAT→GMST ratio, the hand-tuned SSP1-1.9
//! correction) lives in an immutable configuration struct passed into the
//! component that uses it. Nothing reads ambient module-level state, so the
//! pipeline can be run with alternate parameters in tests.
//!
//! ## Key concepts
//!
//! * **Half-widths**: the smoother is parameterized by an inner and outer
//!   window half-width; the core (most trusted) half-width is their mean,
//!   rounded up when converting to whole years.
//! * **Policy data**: the quadratic correction for one strongly-mitigating
//!   pathway is an empirical judgment call, not a derived result. It is
//!   plain data here and can be disabled by setting it to `None`.

use crate::scenarios::Scenario;

// ============================================================================
// SmootherConfig
// ============================================================================

/// Parameters of the 7-stage moving-window smoother.
///
/// Defaults match the reference processing for the ClimTrace record; the
/// published decadal tables are produced with
/// `SmootherConfig { start_year: 1850, end_year: 2040, ..Default::default() }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmootherConfig {
    /// First year of the returned series.
    pub start_year: i32,
    /// Last year of the returned series (inclusive); years past the data end
    /// are filled by extrapolation stages 3–7.
    pub end_year: i32,
    /// Inner (smallest trusted) window half-width, in years.
    pub inner_half_width: usize,
    /// Outer (largest) window half-width, in years; must be at least the
    /// inner half-width.
    pub outer_half_width: usize,
    /// First year of the cosine-tapered trend flattening.
    pub flattening_start: i32,
    /// Last year with observed data.
    pub data_end: i32,
    /// Earliest year admitted into the curvature-variability estimate of
    /// stage 6 (the record is too sparse before it).
    pub curvature_reference_start: i32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            start_year: 1960,
            end_year: 2023,
            inner_half_width: 8,
            outer_half_width: 11,
            flattening_start: 2019,
            data_end: 2023,
            curvature_reference_start: 1971,
        }
    }
}

impl SmootherConfig {
    /// Inner full window width, `2·inner + 1`.
    #[inline]
    pub fn inner_full_width(&self) -> usize {
        2 * self.inner_half_width + 1
    }

    /// Outer full window width, `2·outer + 1`.
    #[inline]
    pub fn outer_full_width(&self) -> usize {
        2 * self.outer_half_width + 1
    }

    /// Core full window width, the mean of the inner and outer full widths:
    /// `inner + outer + 1`.
    #[inline]
    pub fn core_full_width(&self) -> usize {
        self.inner_half_width + self.outer_half_width + 1
    }

    /// Core half-width in whole years (mean of the half-widths, rounded up).
    #[inline]
    pub fn core_half_width_years(&self) -> i32 {
        (self.inner_half_width + self.outer_half_width).div_ceil(2) as i32
    }

    /// Half-width of the boxcar noise filter applied after stages 1 and 4.
    #[inline]
    pub fn jitter_half_width(&self) -> usize {
        self.inner_half_width / 4
    }
}

// ============================================================================
// AdjustmentConfig
// ============================================================================

/// A deterministic quadratic correction added to one scenario's levels.
///
/// Compensates for an identified over-optimistic negative-emissions
/// assumption in that pathway's raw data: `c·(year − start_year)²` is added
/// for every year at or after `start_year`. The default coefficient is the
/// reference value `0.00045 · (0.2 / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCorrection {
    /// Scenario the correction applies to.
    pub scenario: Scenario,
    /// First year the correction takes effect.
    pub start_year: i32,
    /// Quadratic coefficient, in °C per (year since `start_year`)².
    pub coefficient: f64,
}

/// Parameters of scenario anchoring and relative adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentConfig {
    /// The year at which scenarios are forced to match the observed record.
    pub pivot_year: i32,
    /// Years over which the adjustment factor fades linearly back to 1.0
    /// (inclusive of both endpoints).
    pub fade_out_years: usize,
    /// First year of the scenario derivative table.
    pub derivative_start: i32,
    /// Last year of the scenario derivative table (inclusive).
    pub derivative_end: i32,
    /// Optional hand-tuned level correction (policy data, disableable).
    pub correction: Option<QuadraticCorrection>,
    /// Fixed empirical GSAT/GMST ratio; GMST tracks are GSAT divided by it.
    pub gsat_to_gmst_ratio: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            pivot_year: 2021,
            fade_out_years: 21,
            derivative_start: 2021,
            derivative_end: 2100,
            correction: Some(QuadraticCorrection {
                scenario: Scenario::Ssp119,
                start_year: 2060,
                coefficient: 0.00045 * (0.2 / 2.0),
            }),
            gsat_to_gmst_ratio: 1.06,
        }
    }
}
