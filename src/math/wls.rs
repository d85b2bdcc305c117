//! Weighted least squares for the local linear fit.
//!
//! ## Purpose
//!
//! This module provides the single regression primitive the whole pipeline is
//! built on: a weighted least-squares fit of `y = a + b·x` with standard
//! errors for both coefficients.
//!
//! ## Design notes
//!
//! * **Closed form**: every fit in this crate has exactly two coefficients,
//!   so the normal equations are accumulated and solved directly instead of
//!   going through a general matrix backend.
//! * **Classical covariance**: `cov(β) = (X'WX)⁻¹ · s²` with
//!   `s² = Σ wᵢrᵢ² / (n − 2)`. With zero residual degrees of freedom
//!   (`n = 2`) the fit is exact and both standard errors are zero.
//!
//! ## Invariants
//!
//! * Inputs of matching length `n ≥ 2`, at least one positive weight, and a
//!   non-constant `x` always produce finite coefficients.
//! * The fit is deterministic and side-effect free.

use num_traits::Float;

use crate::primitives::errors::ClimTraceError;

// ============================================================================
// WlsFit
// ============================================================================

/// Result of one weighted linear regression.
///
/// Scoped to a single (center, window-width) pair inside the EOT filter;
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WlsFit<T> {
    /// Intercept `a`.
    pub intercept: T,
    /// Slope `b`.
    pub slope: T,
    /// Standard error of the intercept.
    pub intercept_stderr: T,
    /// Standard error of the slope.
    pub slope_stderr: T,
}

impl<T: Float> WlsFit<T> {
    /// Predicted value `a + b·x` at `x`.
    #[inline]
    pub fn predict(&self, x: T) -> T {
        self.intercept + self.slope * x
    }
}

// ============================================================================
// Fit
// ============================================================================

/// Fit `y = a + b·x` by weighted least squares.
///
/// Fails on fewer than two points, mismatched input lengths, an all-zero
/// weight vector, or a constant `x` (singular design matrix).
pub fn wls_fit<T: Float>(y: &[T], x: &[T], weights: &[T]) -> Result<WlsFit<T>, ClimTraceError> {
    let n = y.len();
    if n != x.len() || n != weights.len() {
        return Err(ClimTraceError::MismatchedInputs {
            y_len: n,
            x_len: x.len(),
            w_len: weights.len(),
        });
    }
    if n < 2 {
        return Err(ClimTraceError::TooFewPoints { got: n, min: 2 });
    }

    // Accumulate the weighted normal equations.
    let mut s_w = T::zero();
    let mut s_x = T::zero();
    let mut s_xx = T::zero();
    let mut s_y = T::zero();
    let mut s_xy = T::zero();
    for i in 0..n {
        let w = weights[i];
        let wx = w * x[i];
        s_w = s_w + w;
        s_x = s_x + wx;
        s_xx = s_xx + wx * x[i];
        s_y = s_y + w * y[i];
        s_xy = s_xy + wx * y[i];
    }
    if s_w <= T::zero() {
        return Err(ClimTraceError::ZeroWeightSum);
    }

    let det = s_w * s_xx - s_x * s_x;
    if det <= T::epsilon() * s_w * s_xx.max(T::one()) {
        return Err(ClimTraceError::DegenerateDesign);
    }

    let slope = (s_w * s_xy - s_x * s_y) / det;
    let intercept = (s_xx * s_y - s_x * s_xy) / det;

    // Weighted residual variance with n - 2 degrees of freedom.
    let mut wrss = T::zero();
    for i in 0..n {
        let r = y[i] - intercept - slope * x[i];
        wrss = wrss + weights[i] * r * r;
    }
    let scale = if n > 2 {
        wrss / T::from(n - 2).expect("dof fits in float")
    } else {
        T::zero()
    };

    Ok(WlsFit {
        intercept,
        slope,
        intercept_stderr: (scale * s_xx / det).sqrt(),
        slope_stderr: (scale * s_w / det).sqrt(),
    })
}
