//! Kernel weights for regressor smoothing.
//!
//! The regression pre-processor smooths each climate index with a centered
//! Hamming-weighted moving average before fitting. Only the Hamming window is
//! needed here; the EOT filter itself uses unit/half-edge weights (see
//! `math::window`).

use num_traits::Float;

/// Hamming window weights of length `m`.
///
/// `w[k] = 0.54 − 0.46·cos(2πk / (m − 1))`; a length-1 window is the
/// identity weight.
pub fn hamming<T: Float>(m: usize) -> Vec<T> {
    if m <= 1 {
        return vec![T::one(); m.max(1)];
    }
    let a0 = T::from(0.54).expect("constant is representable");
    let a1 = T::from(0.46).expect("constant is representable");
    let denom = T::from(m - 1).expect("window length fits in float");
    let two_pi = T::from(core::f64::consts::TAU).expect("tau is representable");
    (0..m)
        .map(|k| {
            let k = T::from(k).expect("index fits in float");
            a0 - a1 * (two_pi * k / denom).cos()
        })
        .collect()
}
