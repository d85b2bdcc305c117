//! Tests for the ensemble-of-trends filter.
//!
//! The key analytic property: on exactly linear data every local fit — of
//! any width, centered or boundary-shifted — reproduces the line perfectly,
//! so the filter must return the input line, its slope, and zero
//! uncertainties.
//!
//! ## Test Organization
//!
//! 1. **Linear Exactness** - anomaly, derivative, sigmas on a pure line
//! 2. **Curved-Data Aggregation** - the ensemble against direct fits
//! 3. **Derivative Validity** - the NaN margin at the boundaries
//! 4. **NaN Propagation** - undefined inputs stay undefined
//! 5. **Configuration Errors** - invalid ensembles, short series

use approx::assert_relative_eq;

use climtrace::algorithms::EotFilter;
use climtrace::primitives::{ClimTraceError, TimeSeries};

fn line(start: i32, n: usize, intercept: f64, slope: f64) -> TimeSeries<f64> {
    let values = (0..n).map(|k| intercept + slope * k as f64).collect();
    TimeSeries::new(start, values).unwrap()
}

// ============================================================================
// Linear Exactness Tests
// ============================================================================

/// On a pure line the anomaly equals the input at every step, including the
/// boundary-extrapolated ones.
#[test]
fn test_linear_anomaly_exact() {
    let series = line(1970, 30, 0.1, 2.0);
    let out = EotFilter::new(7, 2).unwrap().run(&series).unwrap();
    for (year, v) in series.iter() {
        assert_relative_eq!(out.anomaly.at_or_nan(year), v, epsilon = 1e-9);
    }
}

/// On a pure line the derivative equals the slope wherever it is defined,
/// and both sigmas vanish.
#[test]
fn test_linear_derivative_and_sigmas() {
    let series = line(0, 30, 0.0, 2.0);
    let out = EotFilter::new(7, 2).unwrap().run(&series).unwrap();
    for year in 3..=26 {
        assert_relative_eq!(out.derivative.at_or_nan(year), 2.0, epsilon = 1e-9);
        assert_relative_eq!(out.derivative_sigma.at_or_nan(year), 0.0, epsilon = 1e-9);
    }
    for (year, v) in out.anomaly_sigma.iter() {
        assert!(v.abs() < 1e-9, "anomaly sigma at {year} is {v}");
    }
}

/// An even core width (half-weighted edge windows) is linear-exact too.
#[test]
fn test_even_core_width_linear_exact() {
    let series = line(0, 25, -1.0, 0.5);
    let out = EotFilter::new(6, 0).unwrap().run(&series).unwrap();
    for (year, v) in series.iter() {
        assert_relative_eq!(out.anomaly.at_or_nan(year), v, epsilon = 1e-9);
    }
    assert_relative_eq!(out.derivative.at_or_nan(12), 0.5, epsilon = 1e-9);
}

// ============================================================================
// Curved-Data Aggregation Tests
// ============================================================================

/// Center value and slope of one local fit, solved directly from the
/// weighted normal equations with the window shifted flush against the
/// boundaries and the center extrapolated along the fitted line.
fn direct_fit(series: &TimeSeries<f64>, i: i32, width: usize) -> (f64, f64) {
    let (delta, weights) = if width % 2 == 1 {
        (((width - 1) / 2) as i32, vec![1.0; width])
    } else {
        let mut w = vec![1.0; width + 1];
        w[0] = 0.5;
        w[width] = 0.5;
        ((width / 2) as i32, w)
    };
    let j = if i - delta < series.start() {
        series.start() + delta
    } else if i + delta > series.end() {
        series.end() - delta
    } else {
        i
    };
    let (mut sw, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (k, &w) in weights.iter().enumerate() {
        let x = k as f64 - f64::from(delta);
        let y = series.at_or_nan(j - delta + k as i32);
        sw += w;
        sx += w * x;
        sy += w * y;
        sxx += w * x * x;
        sxy += w * x * y;
    }
    let det = sw * sxx - sx * sx;
    let a = (sxx * sy - sx * sxy) / det;
    let b = (sw * sxy - sx * sy) / det;
    (a + f64::from(i - j) * b, b)
}

/// On curved data the anomaly is the mean of the per-width center values
/// and the derivative is the central-width slope, boundary-shifted windows
/// included.
#[test]
fn test_quadratic_matches_direct_ensemble() {
    let values: Vec<f64> = (0..40)
        .map(|k| 1.0 + 0.3 * k as f64 + 0.02 * (k as f64) * (k as f64))
        .collect();
    let series = TimeSeries::new(0, values).unwrap();
    let out = EotFilter::new(7, 2).unwrap().run(&series).unwrap();

    for i in 0..40 {
        let mut center_sum = 0.0;
        let mut central_slope = f64::NAN;
        for width in 5..=9 {
            let (center, slope) = direct_fit(&series, i, width);
            center_sum += center;
            if width == 7 {
                central_slope = slope;
            }
        }
        assert_relative_eq!(out.anomaly.at_or_nan(i), center_sum / 5.0, epsilon = 1e-12);
        if (3..=36).contains(&i) {
            assert_relative_eq!(out.derivative.at_or_nan(i), central_slope, epsilon = 1e-12);
        }
    }
}

// ============================================================================
// Derivative Validity Tests
// ============================================================================

/// The derivative is NaN where the central window is not fully covered.
#[test]
fn test_derivative_nan_margin() {
    let series = line(0, 30, 0.0, 1.0);
    let out = EotFilter::new(7, 2).unwrap().run(&series).unwrap();
    // Margin is core_width / 2 = 3 steps on each side.
    for year in [0, 1, 2, 27, 28, 29] {
        assert!(out.derivative.at_or_nan(year).is_nan());
        assert!(out.derivative_sigma.at_or_nan(year).is_nan());
    }
    assert!(out.derivative.at_or_nan(3).is_finite());
    assert!(out.derivative.at_or_nan(26).is_finite());
}

/// Output series share the input index exactly.
#[test]
fn test_output_index_matches_input() {
    let series = line(1950, 40, 0.0, 1.0);
    let out = EotFilter::new(9, 1).unwrap().run(&series).unwrap();
    assert_eq!(out.anomaly.start(), 1950);
    assert_eq!(out.anomaly.end(), 1989);
    assert_eq!(out.derivative.start(), 1950);
    assert_eq!(out.derivative_sigma.end(), 1989);
}

// ============================================================================
// NaN Propagation Tests
// ============================================================================

/// A NaN input year poisons exactly the steps whose windows reach it.
#[test]
fn test_nan_propagates_locally() {
    let mut series = line(0, 40, 0.0, 2.0);
    series.set(10, f64::NAN);
    let out = EotFilter::new(7, 2).unwrap().run(&series).unwrap();
    // The widest window has half-width 4, so step 10 itself is poisoned…
    assert!(out.anomaly.at_or_nan(10).is_nan());
    assert!(out.anomaly.at_or_nan(14).is_nan());
    // …but a step far from the gap is untouched.
    assert_relative_eq!(out.anomaly.at_or_nan(25), 50.0, epsilon = 1e-9);
}

// ============================================================================
// Configuration Error Tests
// ============================================================================

/// A width range that produces sub-2-point windows is rejected.
#[test]
fn test_invalid_ensemble() {
    let err = EotFilter::new(4, 3).unwrap_err();
    assert_eq!(
        err,
        ClimTraceError::InvalidWindowEnsemble {
            core_width: 4,
            width_range: 3,
        }
    );
}

/// The series must hold at least the widest candidate window.
#[test]
fn test_series_too_short() {
    let series = line(0, 8, 0.0, 1.0);
    let err = EotFilter::new(7, 2).unwrap().run(&series).unwrap_err();
    assert_eq!(err, ClimTraceError::TooFewPoints { got: 8, min: 9 });
}
