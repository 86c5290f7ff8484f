//! # anofox-seasonality
//!
//! Seasonal decomposition and period detection for time series.
//!
//! Provides STL and MSTL decomposition built on a LOESS smoother, a
//! least-squares periodogram for detecting seasonal periods, and an analyzer
//! that chains detection with the matching decomposition.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod detection;
pub mod error;
pub mod seasonality;
pub mod smoothing;
pub mod utils;

pub use error::{Result, SeasonalityError};

pub mod prelude {
    pub use crate::detection::{detect_periods, SeasonalityDetector};
    pub use crate::error::{Result, SeasonalityError};
    pub use crate::seasonality::{
        analyze_seasonality, decompose_mstl, decompose_stl, Decomposition, MSTLConfig,
        SeasonalityAnalysis, SeasonalityAnalyzer, STLConfig,
    };
}
