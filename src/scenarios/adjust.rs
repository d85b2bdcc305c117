//! Relative adjustment of scenario trajectories to the observed trend.
//!
//! ## Purpose
//!
//! Anchoring alone matches scenario *levels* to the observation at the pivot
//! year, but the scenarios' near-term *rates* can still disagree with the
//! observed decadal derivative. This module rescales each scenario's
//! derivative to match the observed rate at the pivot, fades that rescaling
//! out over a fixed horizon, and propagates the change back into absolute
//! levels by cumulative trapezoidal integration, so the adjustment is
//! smooth and introduces no discontinuity at the pivot.
//!
//! ## Key concepts
//!
//! * **Adjustment factor**: `f = observed_derivative[p] / scenario_derivative[p]`
//!   at the pivot year `p`; a zero denominator makes the adjustment undefined
//!   for that column (fatal for that column, independent of the others).
//! * **Fade-out**: the per-year factor curve runs linearly from `f` at the
//!   pivot to `1.0` after the configured horizon, then stays at `1.0`; the
//!   scenario relaxes toward unadjusted model behavior.
//! * **Near-pivot blend**: a short centered mean over the transition window
//!   removes the residual kink where observation hands over to scenario.

use log::debug;
use num_traits::Float;

use crate::config::AdjustmentConfig;
use crate::math::wls_fit;
use crate::primitives::{ClimTraceError, TimeSeries};
use crate::scenarios::ScenarioTable;

/// Years of observed derivative spliced in ahead of the pivot, and the
/// half-width of the centered blend window around the handover.
const BLEND_LEAD_YEARS: i32 = 4;
const BLEND_HALF_WIDTH: i32 = 2;

// ============================================================================
// Scenario derivatives
// ============================================================================

/// Local linear trend rate of every scenario column, per year of the
/// configured derivative range.
///
/// Each rate is the slope of an unweighted 5-point fit over `t − 2 ..= t + 2`;
/// at the table's far end the window is clipped (the published derivative
/// tables depend on the 4- and 3-point fits of the final two years).
pub fn scenario_derivatives<T: Float>(
    scenarios: &ScenarioTable<T>,
    config: &AdjustmentConfig,
) -> Result<ScenarioTable<T>, ClimTraceError> {
    let mut derivatives = ScenarioTable::new();
    for (scenario, series) in scenarios.iter() {
        let mut slopes = Vec::with_capacity(
            (config.derivative_end - config.derivative_start + 1) as usize,
        );
        for t in config.derivative_start..=config.derivative_end {
            let lo = (t - 2).max(series.start());
            let hi = (t + 2).min(series.end());
            if hi - lo + 1 < 2 {
                return Err(ClimTraceError::InsufficientCoverage {
                    needed: (t - 2, t + 2),
                    got: (series.start(), series.end()),
                });
            }
            // Window-relative abscissa; the slope is invariant under the
            // shift and the normal equations stay well conditioned.
            let years: Vec<T> = (0..=hi - lo)
                .map(|k| T::from(k).expect("offset fits in float"))
                .collect();
            let values: Vec<T> = (lo..=hi).map(|y| series.at_or_nan(y)).collect();
            let weights = vec![T::one(); values.len()];
            let fit = wls_fit(&values, &years, &weights)?;
            slopes.push(fit.slope);
        }
        derivatives.insert(
            scenario,
            TimeSeries::new(config.derivative_start, slopes)?,
        )?;
    }
    Ok(derivatives)
}

// ============================================================================
// Relative adjustment
// ============================================================================

/// Adjusted scenario levels and derivatives, on their respective indices.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedScenarios<T> {
    /// Adjusted absolute levels, on the anchored table's index.
    pub levels: ScenarioTable<T>,
    /// Adjusted (and near-pivot blended) derivatives, from
    /// `pivot − 4` to the derivative range end.
    pub derivatives: ScenarioTable<T>,
}

/// Rescale scenario derivatives to match the observed derivative at the
/// pivot year and propagate the change into levels.
///
/// Fails per column if the scenario derivative at the pivot is missing or
/// zero; fails outright if the observation is missing at a required year or
/// the configured quadratic correction names a scenario absent from the
/// table.
pub fn adjust_to_observations<T: Float>(
    anchored: &ScenarioTable<T>,
    derivatives: &ScenarioTable<T>,
    obs_derivative: &TimeSeries<T>,
    config: &AdjustmentConfig,
) -> Result<AdjustedScenarios<T>, ClimTraceError> {
    let pivot = config.pivot_year;
    if config.derivative_end < pivot + BLEND_HALF_WIDTH + 1 {
        return Err(ClimTraceError::InvalidConfig(format!(
            "derivative range must reach past the blend window (needs {}, ends {})",
            pivot + BLEND_HALF_WIDTH + 1,
            config.derivative_end
        )));
    }
    let obs_rate = obs_derivative
        .get(pivot)
        .filter(|v| v.is_finite())
        .ok_or(ClimTraceError::MissingObservation { year: pivot })?;

    let mut adj_levels = ScenarioTable::new();
    let mut adj_derivatives = ScenarioTable::new();

    for (scenario, derivative) in derivatives.iter() {
        let scen_rate = derivative.get(pivot).filter(|v| v.is_finite()).ok_or(
            ClimTraceError::MissingScenarioValue {
                scenario: scenario.name(),
                year: pivot,
            },
        )?;
        if scen_rate == T::zero() {
            return Err(ClimTraceError::ZeroPivotDerivative {
                scenario: scenario.name(),
                year: pivot,
            });
        }
        let factor = obs_rate / scen_rate;
        debug!(
            "adjust: scenario {} pivot factor = {}",
            scenario,
            factor.to_f64().unwrap_or(f64::NAN)
        );

        // Factor curve: linear fade from `factor` at the pivot to 1.0 over
        // the horizon, then exactly 1.0.
        let adjusted = TimeSeries::new(
            derivative.start(),
            derivative
                .iter()
                .map(|(year, v)| v * fade_factor(factor, year - pivot, config.fade_out_years))
                .collect(),
        )?;

        // Convert the derivative difference into a cumulative level
        // adjustment (trapezoidal, zero at the range start) and add it to
        // the anchored levels.
        let delta = adjusted.zip_map(derivative, |a, b| a - b)?;
        let level_series = anchored.series(scenario)?;
        if !level_series.covers(delta.start(), delta.end()) {
            return Err(ClimTraceError::InsufficientCoverage {
                needed: (delta.start(), delta.end()),
                got: (level_series.start(), level_series.end()),
            });
        }
        let mut adjusted_level = level_series.clone();
        let half = T::from(0.5).expect("0.5 is representable");
        let mut cumulative = T::zero();
        adjusted_level.set(
            delta.start(),
            adjusted_level.at_or_nan(delta.start()) + cumulative,
        );
        for year in delta.start() + 1..=delta.end() {
            cumulative =
                cumulative + half * (delta.at_or_nan(year - 1) + delta.at_or_nan(year));
            adjusted_level.set(year, adjusted_level.at_or_nan(year) + cumulative);
        }

        adj_levels.insert(scenario, adjusted_level)?;
        adj_derivatives.insert(
            scenario,
            blend_near_pivot(&adjusted, obs_derivative, config)?,
        )?;
    }

    apply_correction(&mut adj_levels, config)?;

    Ok(AdjustedScenarios {
        levels: adj_levels,
        derivatives: adj_derivatives,
    })
}

/// Per-year adjustment factor: `f` at the pivot, 1.0 from the end of the
/// fade-out horizon onward.
fn fade_factor<T: Float>(f: T, years_since_pivot: i32, horizon: usize) -> T {
    let k = years_since_pivot.max(0) as usize;
    if k + 1 >= horizon {
        return T::one();
    }
    let frac = T::from(k).expect("offset fits in float")
        / T::from(horizon - 1).expect("horizon fits in float");
    f + (T::one() - f) * frac
}

/// Splice the observed derivative in ahead of the pivot and smooth the
/// handover with a centered 5-point mean.
fn blend_near_pivot<T: Float>(
    adjusted: &TimeSeries<T>,
    obs_derivative: &TimeSeries<T>,
    config: &AdjustmentConfig,
) -> Result<TimeSeries<T>, ClimTraceError> {
    let pivot = config.pivot_year;
    let blend_start = pivot - BLEND_LEAD_YEARS;
    let mut blended = adjusted.reindex(blend_start, config.derivative_end)?;

    for year in blend_start..pivot {
        let v = obs_derivative
            .get(year)
            .filter(|v| v.is_finite())
            .ok_or(ClimTraceError::MissingObservation { year })?;
        blended.set(year, v);
    }

    // Smooth over a snapshot so already-blended years do not feed back into
    // the window means.
    let snapshot = blended.clone();
    let width = T::from(2 * BLEND_HALF_WIDTH + 1).expect("width fits in float");
    for year in pivot - BLEND_HALF_WIDTH..=pivot + BLEND_HALF_WIDTH + 1 {
        let mut sum = T::zero();
        for w in year - BLEND_HALF_WIDTH..=year + BLEND_HALF_WIDTH {
            sum = sum + snapshot.at_or_nan(w);
        }
        blended.set(year, sum / width);
    }
    Ok(blended)
}

/// Add the configured quadratic level correction to its scenario.
fn apply_correction<T: Float>(
    levels: &mut ScenarioTable<T>,
    config: &AdjustmentConfig,
) -> Result<(), ClimTraceError> {
    let correction = match config.correction {
        Some(c) => c,
        None => return Ok(()),
    };
    let series = levels.series(correction.scenario).map_err(|_| {
        ClimTraceError::InvalidConfig(format!(
            "quadratic correction targets scenario '{}', which is absent from the table",
            correction.scenario
        ))
    })?;
    let coeff = T::from(correction.coefficient).expect("coefficient is representable");
    let corrected = TimeSeries::new(
        series.start(),
        series
            .iter()
            .map(|(year, v)| {
                if year >= correction.start_year {
                    let dt = T::from(year - correction.start_year).expect("year fits in float");
                    v + coeff * dt * dt
                } else {
                    v
                }
            })
            .collect(),
    )?;
    levels.insert(correction.scenario, corrected)?;
    Ok(())
}
