//! Detection of seasonal periods.
//!
//! This module provides:
//! - A least-squares periodogram over integer candidate periods
//! - Peak extraction with neighbour diagnostics
//! - A configurable detector returning the strongest periods

mod detector;
mod periodogram;

pub use detector::{detect_periods, DetectorBuilder, SeasonalityDetector, DEFAULT_MAX_PEAKS};
pub use periodogram::{Periodogram, PeriodogramPeak};
