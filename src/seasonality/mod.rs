//! Seasonality decomposition and analysis.
//!
//! This module provides tools for analyzing seasonal patterns in time series:
//! - STL: Seasonal-Trend decomposition using LOESS
//! - MSTL: Multiple seasonal-trend decomposition for multiple periods
//! - Analyzer: period detection followed by the matching decomposition

mod analyzer;
mod mstl;
mod stl;

pub use analyzer::{
    analyze_seasonality, Decomposition, SeasonalityAnalysis, SeasonalityAnalyzer,
    SeasonalityComponents,
};
pub use mstl::{decompose_mstl, MSTLBuilder, MSTLConfig, MSTLResult};
pub use stl::{decompose_stl, STLBuilder, STLConfig, STLResult};
