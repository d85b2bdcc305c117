//! Window geometry for the ensemble-of-trends filter.
//!
//! ## Purpose
//!
//! This module describes the shape and placement of one local-fit window:
//! how a candidate width maps to a half-width and point weights, and where
//! the window lands when it would extend past a series boundary.
//!
//! ## Key concepts
//!
//! * **Even widths**: a window with an even width has no exact center year.
//!   These are handled with the next larger odd point count and
//!   half-weighted edge years.
//! * **Placement**: each (center, width) pair resolves to exactly one of
//!   three outcomes — centered, shifted forward to the series start, or
//!   shifted backward to the series end. Shifted fits extrapolate the
//!   center value as `a + (i − j)·b` where `j` is the shifted center, so the
//!   extrapolation formula exists in one place.

use num_traits::Float;

use crate::primitives::errors::ClimTraceError;

// ============================================================================
// WindowShape
// ============================================================================

/// Half-width and point weights for one candidate window width.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowShape<T> {
    /// Steps on each side of the center; the window spans `2 * half_width + 1`
    /// points.
    pub half_width: i32,
    /// Per-point weights, in index order.
    pub weights: Vec<T>,
}

impl<T: Float> WindowShape<T> {
    /// Resolve a candidate width to its shape.
    ///
    /// Odd widths use unit weights over `width` points. Even widths use
    /// `width + 1` points with the two edge points half-weighted.
    pub fn for_width(width: usize) -> Result<Self, ClimTraceError> {
        if width < 2 {
            return Err(ClimTraceError::TooFewPoints { got: width, min: 2 });
        }
        let half = T::from(0.5).expect("0.5 is representable");
        if width % 2 == 1 {
            Ok(Self {
                half_width: ((width - 1) / 2) as i32,
                weights: vec![T::one(); width],
            })
        } else {
            let mut weights = vec![T::one(); width + 1];
            weights[0] = half;
            weights[width] = half;
            Ok(Self {
                half_width: (width / 2) as i32,
                weights,
            })
        }
    }

    /// Number of points in the window.
    #[inline]
    pub fn points(&self) -> usize {
        self.weights.len()
    }

    /// The zero-centered integer abscissa `-δ..=δ` used for the local fit.
    ///
    /// Centering keys the intercept estimate to the window center.
    pub fn abscissa(&self) -> Vec<T> {
        (-self.half_width..=self.half_width)
            .map(|k| T::from(k).expect("abscissa fits in float"))
            .collect()
    }
}

// ============================================================================
// WindowPlacement
// ============================================================================

/// Placement outcome for one (center, half-width) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPlacement {
    /// The full window fits inside the series; fit directly at the center.
    Centered,

    /// The window would extend before the series start; it is shifted so its
    /// first point aligns with the series start. Payload: shifted center `j`.
    ShiftedForward(i32),

    /// The window would extend past the series end; it is shifted so its last
    /// point aligns with the series end. Payload: shifted center `j`.
    ShiftedBackward(i32),
}

impl WindowPlacement {
    /// Resolve the placement of a window of half-width `delta` around
    /// `center` within a series covering `[first, last]`.
    pub fn resolve(center: i32, delta: i32, first: i32, last: i32) -> Self {
        if center - delta >= first && center + delta <= last {
            WindowPlacement::Centered
        } else if center - delta < first {
            WindowPlacement::ShiftedForward(first + delta)
        } else {
            WindowPlacement::ShiftedBackward(last - delta)
        }
    }

    /// The year the fit is actually centered on.
    #[inline]
    pub fn fit_center(&self, requested: i32) -> i32 {
        match self {
            WindowPlacement::Centered => requested,
            WindowPlacement::ShiftedForward(j) | WindowPlacement::ShiftedBackward(j) => *j,
        }
    }

    /// Signed distance `i − j` from the fit center to the requested center;
    /// zero for centered placements.
    #[inline]
    pub fn extrapolation_offset(&self, requested: i32) -> i32 {
        requested - self.fit_center(requested)
    }
}
