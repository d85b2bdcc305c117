//! Contiguous integer-indexed series types.
//!
//! ## Purpose
//!
//! This module provides the fundamental data structures the pipeline operates
//! on: [`TimeSeries`] (an ordered mapping from a contiguous integer step to a
//! value) and [`UncertainTimeSeries`] (a value series paired with one-sigma
//! uncertainties on the same index).
//!
//! ## Key concepts
//!
//! * **Step**: the integer index unit. Annual series use the calendar year;
//!   monthly series (in `predictors`) use `year * 12 + month0`.
//! * **NaN as "undefined"**: a series always covers its full index range;
//!   steps with no meaningful value hold NaN. Reindexing introduces NaN for
//!   uninitialized steps, and smoothing operations never propagate NaN into
//!   defined regions.
//!
//! ## Invariants
//!
//! * The index is contiguous and strictly increasing by construction; gaps
//!   are a construction-time error.
//! * A series is never empty.
//! * Every stage of the pipeline returns a new series; nothing is mutated
//!   across stage boundaries except by explicit return.

use num_traits::Float;

use crate::primitives::errors::ClimTraceError;

// ============================================================================
// TimeSeries
// ============================================================================

/// A contiguous, integer-indexed series of values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    start: i32,
    values: Vec<T>,
}

impl<T: Float> TimeSeries<T> {
    /// Create a series starting at `start` with the given values.
    pub fn new(start: i32, values: Vec<T>) -> Result<Self, ClimTraceError> {
        if values.is_empty() {
            return Err(ClimTraceError::EmptySeries);
        }
        Ok(Self { start, values })
    }

    /// Crate-internal constructor for values whose non-emptiness is already
    /// established by the caller's geometry.
    pub(crate) fn from_raw(start: i32, values: Vec<T>) -> Self {
        debug_assert!(!values.is_empty());
        Self { start, values }
    }

    /// Create a series from `(step, value)` pairs, verifying contiguity.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ClimTraceError>
    where
        I: IntoIterator<Item = (i32, T)>,
    {
        let mut iter = pairs.into_iter();
        let (start, first) = iter.next().ok_or(ClimTraceError::EmptySeries)?;
        let mut values = vec![first];
        let mut expected = start + 1;
        for (step, value) in iter {
            if step != expected {
                return Err(ClimTraceError::NonContiguousIndex {
                    expected,
                    got: step,
                });
            }
            values.push(value);
            expected += 1;
        }
        Ok(Self { start, values })
    }

    /// Create a series holding one constant value over `[start, end]`.
    pub fn constant(start: i32, end: i32, value: T) -> Result<Self, ClimTraceError> {
        if end < start {
            return Err(ClimTraceError::EmptySeries);
        }
        Ok(Self {
            start,
            values: vec![value; (end - start + 1) as usize],
        })
    }

    /// Create an all-zero series over `[start, end]`.
    pub fn zeros(start: i32, end: i32) -> Result<Self, ClimTraceError> {
        Self::constant(start, end, T::zero())
    }

    /// First step of the index.
    #[inline]
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last step of the index (inclusive).
    #[inline]
    pub fn end(&self) -> i32 {
        self.start + self.values.len() as i32 - 1
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A series is never empty; provided for clippy symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `step` lies within the index range.
    #[inline]
    pub fn contains(&self, step: i32) -> bool {
        step >= self.start && step <= self.end()
    }

    /// Whether the index covers all of `[lo, hi]`.
    #[inline]
    pub fn covers(&self, lo: i32, hi: i32) -> bool {
        self.start <= lo && self.end() >= hi
    }

    /// Value at `step`, or `None` outside the index range.
    ///
    /// A `Some(NaN)` means the step is indexed but undefined.
    #[inline]
    pub fn get(&self, step: i32) -> Option<T> {
        self.index_of(step).map(|i| self.values[i])
    }

    /// Value at `step`, NaN outside the index range.
    #[inline]
    pub fn at_or_nan(&self, step: i32) -> T {
        self.get(step).unwrap_or_else(T::nan)
    }

    /// Overwrite the value at `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step` is outside the index range; callers reindex first.
    #[inline]
    pub fn set(&mut self, step: i32, value: T) {
        let i = self
            .index_of(step)
            .unwrap_or_else(|| panic!("step {step} outside series range"));
        self.values[i] = value;
    }

    #[inline]
    fn index_of(&self, step: i32) -> Option<usize> {
        if self.contains(step) {
            Some((step - self.start) as usize)
        } else {
            None
        }
    }

    /// Raw values, in index order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over `(step, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, T)> + '_ {
        let start = self.start;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (start + i as i32, v))
    }

    /// Restrict to the intersection of the index with `[lo, hi]`.
    ///
    /// Bounds are clamped to the available range, mirroring label slicing in
    /// the upstream data tooling. Fails if the intersection is empty.
    pub fn restrict(&self, lo: i32, hi: i32) -> Result<Self, ClimTraceError> {
        let lo = lo.max(self.start);
        let hi = hi.min(self.end());
        if hi < lo {
            return Err(ClimTraceError::EmptySeries);
        }
        let a = (lo - self.start) as usize;
        let b = (hi - self.start) as usize;
        Ok(Self {
            start: lo,
            values: self.values[a..=b].to_vec(),
        })
    }

    /// Rebuild the series on `[lo, hi]`, filling uncovered steps with NaN.
    pub fn reindex(&self, lo: i32, hi: i32) -> Result<Self, ClimTraceError> {
        if hi < lo {
            return Err(ClimTraceError::EmptySeries);
        }
        let values = (lo..=hi).map(|step| self.at_or_nan(step)).collect();
        Ok(Self { start: lo, values })
    }

    /// Relabel the index by `offset` steps (a lag shift: the value formerly
    /// at step `s` is afterwards found at `s + offset`).
    pub fn shifted(&self, offset: i32) -> Self {
        Self {
            start: self.start + offset,
            values: self.values.clone(),
        }
    }

    /// Apply `f` to every value.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            start: self.start,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two same-indexed series elementwise.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Result<Self, ClimTraceError>
    where
        F: Fn(T, T) -> T,
    {
        if self.start != other.start || self.len() != other.len() {
            return Err(ClimTraceError::MismatchedIndex {
                values: (self.start, self.end()),
                sigmas: (other.start, other.end()),
            });
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self {
            start: self.start,
            values,
        })
    }

    /// Root-sum-square combination of two same-indexed uncertainty series.
    pub fn rss_with(&self, other: &Self) -> Result<Self, ClimTraceError> {
        self.zip_map(other, |a, b| (a * a + b * b).sqrt())
    }

    /// First difference: `d[t] = v[t] - v[t-1]`, NaN at the first step.
    pub fn diff(&self) -> Self {
        let mut values = Vec::with_capacity(self.len());
        values.push(T::nan());
        for w in self.values.windows(2) {
            values.push(w[1] - w[0]);
        }
        Self {
            start: self.start,
            values,
        }
    }

    /// Centered boxcar filter with update semantics.
    ///
    /// Each step whose full `2 * half_width + 1` window lies inside the index
    /// and contains only finite values is replaced by the window mean; every
    /// other step keeps its current value. This reproduces a centered rolling
    /// mean merged back over the original series, so edges and NaN
    /// neighborhoods are preserved rather than eroded.
    pub fn boxcar_update(&self, half_width: usize) -> Self {
        if half_width == 0 {
            return self.clone();
        }
        let hw = half_width;
        let n = self.len();
        let width = T::from(2 * hw + 1).expect("window width fits in float");
        let mut values = self.values.clone();
        for i in hw..n.saturating_sub(hw) {
            let window = &self.values[i - hw..=i + hw];
            if window.iter().all(|v| v.is_finite()) {
                let sum = window.iter().fold(T::zero(), |acc, &v| acc + v);
                values[i] = sum / width;
            }
        }
        Self {
            start: self.start,
            values,
        }
    }

    /// NaN-skipping mean over the clamped range `[lo, hi]`.
    ///
    /// Returns NaN if no finite value lies in the range.
    pub fn mean_over(&self, lo: i32, hi: i32) -> T {
        let mut sum = T::zero();
        let mut count = 0usize;
        for step in lo.max(self.start)..=hi.min(self.end()) {
            let v = self.values[(step - self.start) as usize];
            if v.is_finite() {
                sum = sum + v;
                count += 1;
            }
        }
        if count == 0 {
            return T::nan();
        }
        sum / T::from(count).expect("count fits in float")
    }

    /// NaN-skipping sample standard deviation over the clamped range.
    ///
    /// Uses the `n - 1` denominator; returns NaN with fewer than two finite
    /// values.
    pub fn std_over(&self, lo: i32, hi: i32) -> T {
        let mean = self.mean_over(lo, hi);
        if !mean.is_finite() {
            return T::nan();
        }
        let mut ss = T::zero();
        let mut count = 0usize;
        for step in lo.max(self.start)..=hi.min(self.end()) {
            let v = self.values[(step - self.start) as usize];
            if v.is_finite() {
                let d = v - mean;
                ss = ss + d * d;
                count += 1;
            }
        }
        if count < 2 {
            return T::nan();
        }
        (ss / T::from(count - 1).expect("count fits in float")).sqrt()
    }

    /// Replace every non-finite value with `value`.
    pub fn fill_nan(&self, value: T) -> Self {
        self.map(|v| if v.is_finite() { v } else { value })
    }
}

// ============================================================================
// UncertainTimeSeries
// ============================================================================

/// A value series paired with same-indexed one-sigma uncertainties.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertainTimeSeries<T> {
    /// The value series.
    pub values: TimeSeries<T>,
    /// One-sigma uncertainties, on the same index as `values`.
    pub sigmas: TimeSeries<T>,
}

impl<T: Float> UncertainTimeSeries<T> {
    /// Pair values with uncertainties, verifying the shared-index invariant
    /// and that every finite sigma is non-negative.
    pub fn new(values: TimeSeries<T>, sigmas: TimeSeries<T>) -> Result<Self, ClimTraceError> {
        if values.start() != sigmas.start() || values.len() != sigmas.len() {
            return Err(ClimTraceError::MismatchedIndex {
                values: (values.start(), values.end()),
                sigmas: (sigmas.start(), sigmas.end()),
            });
        }
        for (step, sigma) in sigmas.iter() {
            if sigma.is_finite() && sigma < T::zero() {
                return Err(ClimTraceError::NegativeUncertainty {
                    step,
                    sigma: sigma.to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        Ok(Self { values, sigmas })
    }

    /// Restrict both members to `[lo, hi]`.
    pub fn restrict(&self, lo: i32, hi: i32) -> Result<Self, ClimTraceError> {
        Ok(Self {
            values: self.values.restrict(lo, hi)?,
            sigmas: self.sigmas.restrict(lo, hi)?,
        })
    }
}
