//! Tests for the series containers.
//!
//! These tests verify the index arithmetic and NaN conventions everything
//! else in the crate leans on:
//! - Construction and contiguity checking
//! - Slicing (`restrict`) versus rebuilding (`reindex`)
//! - The update-merge boxcar filter
//! - NaN-skipping range statistics
//!
//! ## Test Organization
//!
//! 1. **Construction** - valid and invalid series
//! 2. **Indexing** - lookups, bounds, iteration
//! 3. **Transformation** - restrict, reindex, shift, diff
//! 4. **Filtering and statistics** - boxcar, mean, std
//! 5. **Uncertain series** - pairing invariants

use approx::assert_relative_eq;

use climtrace::primitives::{ClimTraceError, TimeSeries, UncertainTimeSeries};

// ============================================================================
// Construction Tests
// ============================================================================

/// An empty value vector is rejected.
#[test]
fn test_new_rejects_empty() {
    let result = TimeSeries::<f64>::new(2000, vec![]);
    assert_eq!(result.unwrap_err(), ClimTraceError::EmptySeries);
}

/// Pairs with a gap in the index are rejected with the expected step.
#[test]
fn test_from_pairs_rejects_gap() {
    let result = TimeSeries::from_pairs(vec![(2000, 1.0), (2001, 2.0), (2003, 3.0)]);
    assert_eq!(
        result.unwrap_err(),
        ClimTraceError::NonContiguousIndex {
            expected: 2002,
            got: 2003,
        }
    );
}

/// Contiguous pairs build the expected series.
#[test]
fn test_from_pairs_contiguous() {
    let series = TimeSeries::from_pairs(vec![(2000, 1.0), (2001, 2.0), (2002, 3.0)]).unwrap();
    assert_eq!(series.start(), 2000);
    assert_eq!(series.end(), 2002);
    assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
}

/// `constant` covers the closed range.
#[test]
fn test_constant_range() {
    let series = TimeSeries::constant(1990, 1994, 0.5).unwrap();
    assert_eq!(series.len(), 5);
    assert!(series.iter().all(|(_, v)| v == 0.5));
}

// ============================================================================
// Indexing Tests
// ============================================================================

/// `get` distinguishes out-of-range from indexed-but-NaN.
#[test]
fn test_get_and_at_or_nan() {
    let series = TimeSeries::new(2000, vec![1.0, f64::NAN, 3.0]).unwrap();
    assert_eq!(series.get(2000), Some(1.0));
    assert!(series.get(2001).unwrap().is_nan());
    assert_eq!(series.get(1999), None);
    assert!(series.at_or_nan(2050).is_nan());
}

/// `covers` is inclusive on both ends.
#[test]
fn test_covers() {
    let series = TimeSeries::new(2000, vec![0.0; 5]).unwrap();
    assert!(series.covers(2000, 2004));
    assert!(series.covers(2001, 2003));
    assert!(!series.covers(1999, 2004));
    assert!(!series.covers(2000, 2005));
}

// ============================================================================
// Transformation Tests
// ============================================================================

/// `restrict` clamps to the available range.
#[test]
fn test_restrict_clamps() {
    let series = TimeSeries::new(2000, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let cut = series.restrict(1990, 2001).unwrap();
    assert_eq!(cut.start(), 2000);
    assert_eq!(cut.values(), &[1.0, 2.0]);
}

/// `restrict` to a disjoint range is an error.
#[test]
fn test_restrict_disjoint() {
    let series = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    assert_eq!(
        series.restrict(2010, 2020).unwrap_err(),
        ClimTraceError::EmptySeries
    );
}

/// `reindex` both extends with NaN and truncates.
#[test]
fn test_reindex_extends_and_truncates() {
    let series = TimeSeries::<f64>::new(2000, vec![1.0, 2.0, 3.0]).unwrap();
    let wide = series.reindex(1999, 2001).unwrap();
    assert!(wide.at_or_nan(1999).is_nan());
    assert_eq!(wide.at_or_nan(2000), 1.0);
    // 2002 is gone entirely.
    assert_eq!(wide.end(), 2001);
}

/// A positive shift relabels values to later steps.
#[test]
fn test_shifted() {
    let series = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    let lagged = series.shifted(3);
    assert_eq!(lagged.start(), 2003);
    assert_eq!(lagged.at_or_nan(2003), 1.0);
}

/// `diff` is NaN at the first step and the first difference after it.
#[test]
fn test_diff() {
    let series = TimeSeries::<f64>::new(2000, vec![1.0, 4.0, 9.0]).unwrap();
    let d = series.diff();
    assert!(d.at_or_nan(2000).is_nan());
    assert_relative_eq!(d.at_or_nan(2001), 3.0);
    assert_relative_eq!(d.at_or_nan(2002), 5.0);
}

/// `zip_map` requires exactly matching indices.
#[test]
fn test_zip_map_index_mismatch() {
    let a = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    let b = TimeSeries::new(2001, vec![1.0, 2.0]).unwrap();
    assert!(matches!(
        a.zip_map(&b, |x, y| x + y).unwrap_err(),
        ClimTraceError::MismatchedIndex { .. }
    ));
}

/// Root-sum-square combination of two uncertainty series.
#[test]
fn test_rss_with() {
    let a = TimeSeries::new(2000, vec![3.0, 0.0]).unwrap();
    let b = TimeSeries::new(2000, vec![4.0, 2.0]).unwrap();
    let c = a.rss_with(&b).unwrap();
    assert_relative_eq!(c.at_or_nan(2000), 5.0);
    assert_relative_eq!(c.at_or_nan(2001), 2.0);
}

// ============================================================================
// Filtering and Statistics Tests
// ============================================================================

/// Full finite windows are replaced by their mean; edges keep the original
/// values.
#[test]
fn test_boxcar_update_interior_and_edges() {
    let series = TimeSeries::new(0, vec![0.0, 3.0, 6.0, 9.0, 12.0]).unwrap();
    let smoothed = series.boxcar_update(1);
    // Edges untouched.
    assert_relative_eq!(smoothed.at_or_nan(0), 0.0);
    assert_relative_eq!(smoothed.at_or_nan(4), 12.0);
    // Interior means of a linear ramp reproduce the center values.
    assert_relative_eq!(smoothed.at_or_nan(1), 3.0);
    assert_relative_eq!(smoothed.at_or_nan(2), 6.0);
}

/// A window touching NaN keeps the original value at its center.
#[test]
fn test_boxcar_update_preserves_near_nan() {
    let series = TimeSeries::new(0, vec![1.0, 2.0, f64::NAN, 4.0, 5.0]).unwrap();
    let smoothed = series.boxcar_update(1);
    // Positions 1 and 3 see the NaN; they keep their inputs.
    assert_relative_eq!(smoothed.at_or_nan(1), 2.0);
    assert_relative_eq!(smoothed.at_or_nan(3), 4.0);
    assert!(smoothed.at_or_nan(2).is_nan());
}

/// `half_width = 0` is the identity.
#[test]
fn test_boxcar_update_zero_width() {
    let series = TimeSeries::new(0, vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(series.boxcar_update(0), series);
}

/// Range mean skips NaN and clamps the bounds.
#[test]
fn test_mean_over_skips_nan() {
    let series = TimeSeries::new(2000, vec![1.0, f64::NAN, 3.0]).unwrap();
    assert_relative_eq!(series.mean_over(1990, 2010), 2.0);
    assert!(series.mean_over(2001, 2001).is_nan());
}

/// Sample standard deviation uses the n − 1 denominator.
#[test]
fn test_std_over_sample_denominator() {
    let series = TimeSeries::new(0, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    // Variance of [1, 2, 3, 4] with ddof 1 is 5/3.
    assert_relative_eq!(series.std_over(0, 3), (5.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert!(series.std_over(0, 0).is_nan());
}

/// `fill_nan` replaces only non-finite values.
#[test]
fn test_fill_nan() {
    let series = TimeSeries::new(0, vec![1.0, f64::NAN, f64::INFINITY]).unwrap();
    let filled = series.fill_nan(0.0);
    assert_eq!(filled.values(), &[1.0, 0.0, 0.0]);
}

// ============================================================================
// Uncertain Series Tests
// ============================================================================

/// Values and sigmas must share one index.
#[test]
fn test_uncertain_index_mismatch() {
    let values = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    let sigmas = TimeSeries::new(2000, vec![0.1, 0.1, 0.1]).unwrap();
    assert!(matches!(
        UncertainTimeSeries::new(values, sigmas).unwrap_err(),
        ClimTraceError::MismatchedIndex { .. }
    ));
}

/// A negative sigma is rejected with its step.
#[test]
fn test_uncertain_negative_sigma() {
    let values = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    let sigmas = TimeSeries::new(2000, vec![0.1, -0.1]).unwrap();
    assert_eq!(
        UncertainTimeSeries::new(values, sigmas).unwrap_err(),
        ClimTraceError::NegativeUncertainty {
            step: 2001,
            sigma: -0.1,
        }
    );
}

/// A NaN sigma is allowed; it marks an undefined step, not a defect.
#[test]
fn test_uncertain_nan_sigma_allowed() {
    let values = TimeSeries::new(2000, vec![1.0, 2.0]).unwrap();
    let sigmas = TimeSeries::new(2000, vec![0.1, f64::NAN]).unwrap();
    assert!(UncertainTimeSeries::new(values, sigmas).is_ok());
}
