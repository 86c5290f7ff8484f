//! Utility functions for decomposition and detection.

pub mod stats;

pub use stats::{component_strength, mean, median, variance};
