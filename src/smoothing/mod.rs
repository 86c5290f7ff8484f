//! Smoothing primitives used by the decomposition engine.
//!
//! - [`LoessSmoother`]: locally weighted linear regression with tricube weights
//! - [`moving_average`]: valid-mode moving average used by the STL low-pass filter

mod filter;
pub(crate) mod loess;

pub use filter::moving_average;
pub use loess::LoessSmoother;
