//! Tests for the 7-stage moving-window smoother.
//!
//! The workhorse property is linear exactness: every stage of the pipeline
//! (ensemble filtering, boxcar, curvature extension, taper, reintegration)
//! maps a pure line to itself, so an exactly linear record must come out
//! unchanged over the full output range — including the extrapolated years.
//!
//! ## Test Organization
//!
//! 1. **Linear Pipeline** - values, derivative, and sigmas on a pure line
//! 2. **Determinism** - bit-identical repeated runs
//! 3. **Validation** - configuration and coverage failures

use approx::assert_relative_eq;

use climtrace::config::SmootherConfig;
use climtrace::engine::MovingWindowSmoother;
use climtrace::primitives::{ClimTraceError, TimeSeries, UncertainTimeSeries};

const SLOPE: f64 = 0.012;
const OBS_SIGMA: f64 = 0.05;

/// A linear annual record from 1940 through 2023 with constant uncertainty.
fn linear_record() -> UncertainTimeSeries<f64> {
    let values: Vec<f64> = (1940..=2023).map(|y| SLOPE * f64::from(y - 1940)).collect();
    UncertainTimeSeries::new(
        TimeSeries::new(1940, values).unwrap(),
        TimeSeries::constant(1940, 2023, OBS_SIGMA).unwrap(),
    )
    .unwrap()
}

// ============================================================================
// Linear Pipeline Tests
// ============================================================================

/// Output series are indexed exactly `[start_year, end_year]`.
#[test]
fn test_output_index() {
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&linear_record())
        .unwrap();
    for series in [
        &out.decadal_mean,
        &out.decadal_derivative,
        &out.mean_sigma,
        &out.derivative_sigma,
    ] {
        assert_eq!(series.start(), 1960);
        assert_eq!(series.end(), 2023);
    }
}

/// A linear record passes through unchanged, extrapolated years included.
#[test]
fn test_linear_mean_exact() {
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&linear_record())
        .unwrap();
    for year in 1960..=2023 {
        let expected = SLOPE * f64::from(year - 1940);
        assert_relative_eq!(
            out.decadal_mean.at_or_nan(year),
            expected,
            epsilon = 1e-9,
            max_relative = 1e-9
        );
    }
}

/// The decadal derivative of a linear record is its slope everywhere,
/// through the flattened extension (the curvature being extended is zero).
#[test]
fn test_linear_derivative_constant() {
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&linear_record())
        .unwrap();
    for year in 1960..=2023 {
        assert_relative_eq!(
            out.decadal_derivative.at_or_nan(year),
            SLOPE,
            epsilon = 1e-9
        );
    }
}

/// With noiseless fits the mean uncertainty reduces to the observational
/// sigma, and the extension adds nothing for zero curvature variability.
#[test]
fn test_linear_mean_sigma() {
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&linear_record())
        .unwrap();
    for year in 1960..=2023 {
        assert_relative_eq!(out.mean_sigma.at_or_nan(year), OBS_SIGMA, epsilon = 1e-9);
    }
}

/// The derivative sigma is bounded by the 25%-of-magnitude cap on the
/// relative observational term.
#[test]
fn test_linear_derivative_sigma_bounded() {
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&linear_record())
        .unwrap();
    let cap = 0.25 * SLOPE;
    for (year, v) in out.derivative_sigma.iter() {
        assert!(
            v.is_finite() && v > 0.0 && v <= cap + 1e-12,
            "derivative sigma at {year} is {v}"
        );
    }
}

// ============================================================================
// Determinism Tests
// ============================================================================

/// Two runs over the same input are bit-identical.
#[test]
fn test_repeated_runs_identical() {
    let smoother = MovingWindowSmoother::new(SmootherConfig::default()).unwrap();
    let record = linear_record();
    let a = smoother.run(&record).unwrap();
    let b = smoother.run(&record).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Validation Tests
// ============================================================================

/// A zero inner half-width is rejected at construction.
#[test]
fn test_rejects_zero_inner_half_width() {
    let config = SmootherConfig {
        inner_half_width: 0,
        ..SmootherConfig::default()
    };
    assert!(matches!(
        MovingWindowSmoother::new(config).unwrap_err(),
        ClimTraceError::InvalidConfig(_)
    ));
}

/// The inner half-width may not exceed the outer one.
#[test]
fn test_rejects_inverted_half_widths() {
    let config = SmootherConfig {
        inner_half_width: 12,
        outer_half_width: 11,
        ..SmootherConfig::default()
    };
    assert!(MovingWindowSmoother::new(config).is_err());
}

/// The flattening year must not lie past the data end.
#[test]
fn test_rejects_flattening_after_data_end() {
    let config = SmootherConfig {
        flattening_start: 2024,
        ..SmootherConfig::default()
    };
    assert!(MovingWindowSmoother::new(config).is_err());
}

/// A record beginning after the configured start year cannot anchor the
/// output index and is a coverage error, not a silent clamp.
#[test]
fn test_rejects_record_starting_after_start_year() {
    let values: Vec<f64> = (1965..=2023).map(|y| SLOPE * f64::from(y - 1965)).collect();
    let record = UncertainTimeSeries::new(
        TimeSeries::new(1965, values).unwrap(),
        TimeSeries::constant(1965, 2023, OBS_SIGMA).unwrap(),
    )
    .unwrap();
    let err = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&record)
        .unwrap_err();
    assert_eq!(
        err,
        ClimTraceError::InsufficientCoverage {
            needed: (1960, 2023),
            got: (1965, 2023),
        }
    );
}

/// A record beginning between `start_year − outer_half_width` and
/// `start_year` narrows the filter range instead of failing.
#[test]
fn test_accepts_record_starting_inside_outer_margin() {
    let values: Vec<f64> = (1955..=2023).map(|y| SLOPE * f64::from(y - 1955)).collect();
    let record = UncertainTimeSeries::new(
        TimeSeries::new(1955, values).unwrap(),
        TimeSeries::constant(1955, 2023, OBS_SIGMA).unwrap(),
    )
    .unwrap();
    let out = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&record)
        .unwrap();
    assert_eq!(out.decadal_mean.start(), 1960);
    assert_relative_eq!(
        out.decadal_derivative.at_or_nan(2000),
        SLOPE,
        epsilon = 1e-9
    );
}

/// A record ending before the configured data end is a coverage error.
#[test]
fn test_rejects_short_record() {
    let values: Vec<f64> = (1940..=2010).map(|y| SLOPE * f64::from(y - 1940)).collect();
    let record = UncertainTimeSeries::new(
        TimeSeries::new(1940, values).unwrap(),
        TimeSeries::constant(1940, 2010, OBS_SIGMA).unwrap(),
    )
    .unwrap();
    let err = MovingWindowSmoother::new(SmootherConfig::default())
        .unwrap()
        .run(&record)
        .unwrap_err();
    assert!(matches!(err, ClimTraceError::InsufficientCoverage { .. }));
}
