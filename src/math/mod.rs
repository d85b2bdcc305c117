//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure numerical functions used throughout the
//! pipeline:
//! - Weighted least squares for the local linear fit
//! - Window geometry (shapes and boundary placement) for the EOT filter
//! - Kernel weights for regressor smoothing
//!
//! These are reusable building blocks with no pipeline-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: Predictors
//!   ↓
//! Layer 5: Scenarios / Evaluation
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Kernel weights for regressor smoothing.
pub mod kernel;

/// Window shapes and boundary placement.
pub mod window;

/// Weighted least squares.
pub mod wls;

pub use kernel::hamming;
pub use window::{WindowPlacement, WindowShape};
pub use wls::{wls_fit, WlsFit};
