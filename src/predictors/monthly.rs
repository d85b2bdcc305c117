//! Month-indexed series utilities.
//!
//! A monthly series is a plain [`TimeSeries`] whose index is
//! `year·12 + month₀` with `month₀` in `0..12`, so January 2000 sits at
//! `24000`. Contiguity of the index then means "no missing months".

use num_traits::Float;

use crate::math::hamming;
use crate::primitives::TimeSeries;

/// The month index of `(year, month)` with `month` in `1..=12`.
#[inline]
pub fn month_index(year: i32, month: u32) -> i32 {
    debug_assert!((1..=12).contains(&month));
    year * 12 + month as i32 - 1
}

/// The calendar year a month index falls in.
#[inline]
pub fn year_of(index: i32) -> i32 {
    index.div_euclid(12)
}

// ============================================================================
// Hamming smoothing
// ============================================================================

/// Centered Hamming-weighted moving average with edge filling.
///
/// `width` must be odd; a width of 1 returns the input unchanged. Positions
/// whose full window does not fit inside the series take the value of the
/// nearest fully-windowed position (back-fill at the start, forward-fill at
/// the end). A NaN inside a window makes that position NaN.
pub fn hamming_smooth<T: Float>(series: &TimeSeries<T>, width: usize) -> TimeSeries<T> {
    if width <= 1 || series.len() < width {
        return series.clone();
    }
    let weights = hamming::<T>(width);
    let total = weights
        .iter()
        .fold(T::zero(), |acc, &w| acc + w);
    let half = (width / 2) as i32;

    let mut smoothed = vec![T::nan(); series.len()];
    for (pos, center) in (series.start()..=series.end()).enumerate() {
        if center - half < series.start() || center + half > series.end() {
            continue;
        }
        let mut acc = T::zero();
        for (k, &w) in weights.iter().enumerate() {
            acc = acc + w * series.at_or_nan(center - half + k as i32);
        }
        smoothed[pos] = acc / total;
    }

    // Edge fill: the first half-window copies the first computed value, the
    // last half-window the last one.
    let h = half as usize;
    let n = smoothed.len();
    for i in 0..h {
        smoothed[i] = smoothed[h];
        smoothed[n - 1 - i] = smoothed[n - 1 - h];
    }

    TimeSeries::from_raw(series.start(), smoothed)
}

// ============================================================================
// Annual aggregation and monthly stretching
// ============================================================================

/// Per-year mean of the finite months of a monthly series.
///
/// Covers every calendar year the monthly index touches; a year with no
/// finite month is NaN. Years with partial coverage average what is there.
pub fn annual_means<T: Float>(monthly: &TimeSeries<T>) -> TimeSeries<T> {
    let first_year = year_of(monthly.start());
    let last_year = year_of(monthly.end());

    let mut means = Vec::with_capacity((last_year - first_year + 1) as usize);
    for year in first_year..=last_year {
        let mut sum = T::zero();
        let mut count = 0usize;
        for month in 1..=12u32 {
            let v = monthly.at_or_nan(month_index(year, month));
            if v.is_finite() {
                sum = sum + v;
                count += 1;
            }
        }
        means.push(if count == 0 {
            T::nan()
        } else {
            sum / T::from(count).expect("month count fits in float")
        });
    }
    TimeSeries::from_raw(first_year, means)
}

/// Stretch an annual series onto a monthly index by linear interpolation
/// between mid-year anchors.
///
/// Each annual value is anchored at its June; months between anchors are
/// interpolated linearly, months before the first anchor copy it, and
/// months after the last anchor hold it.
pub fn stretch_annual_to_monthly<T: Float>(
    annual: &TimeSeries<T>,
    start: i32,
    end: i32,
) -> TimeSeries<T> {
    let first_anchor = month_index(annual.start(), 6);
    let last_anchor = month_index(annual.end(), 6);
    let twelve = T::from(12).expect("12 is representable");

    let values = (start..=end)
        .map(|m| {
            if m <= first_anchor {
                annual.at_or_nan(annual.start())
            } else if m >= last_anchor {
                annual.at_or_nan(annual.end())
            } else {
                let year = year_of(m - 5);
                let lo = annual.at_or_nan(year);
                let hi = annual.at_or_nan(year + 1);
                let frac = T::from(m - month_index(year, 6)).expect("month offset fits in float")
                    / twelve;
                lo + (hi - lo) * frac
            }
        })
        .collect();
    TimeSeries::from_raw(start, values)
}
