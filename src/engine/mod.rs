//! Layer 4: Engine (validation and pipeline orchestration).
//!
//! Contains the fail-fast input validator and the 7-stage moving-window
//! smoother that drives the EOT filter and propagates uncertainty through
//! every stage.

pub mod smoother;
pub mod validator;

pub use smoother::{MovingWindowSmoother, SmootherOutput};
pub use validator::Validator;
