//! Periodogram-based seasonality detector.

use tracing::{debug, warn};

use super::periodogram::{Periodogram, PeriodogramPeak};
use crate::error::{Result, SeasonalityError};
use crate::utils::stats::{linear_detrend, mean};

/// Default number of peaks returned by [`detect_periods`].
pub const DEFAULT_MAX_PEAKS: usize = 3;

/// Residual energy, relative to the centred series, below which a detrended
/// series counts as a pure line.
const LINEAR_RESIDUAL_TOLERANCE: f64 = 1e-12;

/// Builder for [`SeasonalityDetector`].
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorBuilder {
    min_period: usize,
    max_period: Option<usize>,
    threshold: f64,
    detrend: bool,
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self {
            min_period: 4,
            max_period: None,
            threshold: 0.5,
            detrend: true,
        }
    }
}

impl DetectorBuilder {
    /// Smallest candidate period (at least 2).
    pub fn min_period(mut self, value: usize) -> Self {
        self.min_period = value;
        self
    }

    /// Largest candidate period. Defaults to half the series length.
    pub fn max_period(mut self, value: usize) -> Self {
        self.max_period = Some(value);
        self
    }

    /// Power a peak must strictly exceed, in `(0, 1]`.
    pub fn threshold(mut self, value: f64) -> Self {
        self.threshold = value;
        self
    }

    /// Remove the least-squares line before scoring periods.
    pub fn detrend(mut self, value: bool) -> Self {
        self.detrend = value;
        self
    }

    /// Validate the parameters and build the detector.
    pub fn build(self) -> Result<SeasonalityDetector> {
        if self.min_period < 2 {
            return Err(SeasonalityError::config(format!(
                "min_period must be at least 2, got {}",
                self.min_period
            )));
        }
        if let Some(max) = self.max_period {
            if max < self.min_period {
                return Err(SeasonalityError::config(format!(
                    "max_period {max} is below min_period {}",
                    self.min_period
                )));
            }
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(SeasonalityError::config(format!(
                "threshold must lie in (0, 1], got {}",
                self.threshold
            )));
        }

        Ok(SeasonalityDetector {
            min_period: self.min_period,
            max_period: self.max_period,
            threshold: self.threshold,
            detrend: self.detrend,
        })
    }
}

/// Detects seasonal periods as peaks of a least-squares periodogram.
///
/// Power is an absolute share of variance. By default the least-squares line
/// is removed before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityDetector {
    min_period: usize,
    max_period: Option<usize>,
    threshold: f64,
    detrend: bool,
}

impl Default for SeasonalityDetector {
    fn default() -> Self {
        let defaults = DetectorBuilder::default();
        Self {
            min_period: defaults.min_period,
            max_period: defaults.max_period,
            threshold: defaults.threshold,
            detrend: defaults.detrend,
        }
    }
}

impl SeasonalityDetector {
    /// Start configuring a detector.
    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::default()
    }

    pub fn min_period(&self) -> usize {
        self.min_period
    }

    pub fn max_period(&self) -> Option<usize> {
        self.max_period
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn detrends(&self) -> bool {
        self.detrend
    }

    /// Largest candidate period actually scanned for a series of length `n`.
    pub fn resolved_max_period(&self, n: usize) -> usize {
        let half = n / 2;
        self.max_period
            .map_or(half, |max| max.min(half))
            .max(self.min_period)
    }

    /// Periodogram over the configured period range.
    ///
    /// Scores the linearly detrended series unless detrending is disabled.
    /// Empty when the series is shorter than two minimum periods or nothing
    /// varies once the trend is removed.
    pub fn periodogram(&self, data: &[f64]) -> Periodogram {
        let n = data.len();
        if n < 2 * self.min_period {
            warn!(
                n,
                min_period = self.min_period,
                "seasonality detection skipped: series shorter than two minimum periods"
            );
            return Periodogram::default();
        }

        if self.detrend && is_linear(data) {
            warn!(n, "seasonality detection skipped: series is a straight line");
            return Periodogram::default();
        }

        let max_period = self.resolved_max_period(n);
        let periodogram = if self.detrend {
            Periodogram::compute(&linear_detrend(data), self.min_period, max_period)
        } else {
            Periodogram::compute(data, self.min_period, max_period)
        };
        if periodogram.is_empty() {
            warn!(n, "seasonality detection skipped: series has zero variance");
        }
        periodogram
    }

    /// Periodogram peaks above the detector threshold, strongest first.
    pub fn peaks(&self, data: &[f64]) -> Vec<PeriodogramPeak> {
        self.periodogram(data).peaks(self.threshold)
    }

    /// Up to `max_peaks` detected periods, strongest first.
    ///
    /// An empty result means no seasonality was detected.
    ///
    /// # Example
    /// ```
    /// use anofox_seasonality::detection::SeasonalityDetector;
    ///
    /// let data: Vec<f64> = (0..72)
    ///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
    ///     .collect();
    /// let detector = SeasonalityDetector::builder()
    ///     .min_period(2)
    ///     .threshold(0.6)
    ///     .build()
    ///     .unwrap();
    /// assert!(detector.detect(&data, 5).contains(&12));
    /// ```
    pub fn detect(&self, data: &[f64], max_peaks: usize) -> Vec<usize> {
        let periods: Vec<usize> = self
            .peaks(data)
            .into_iter()
            .take(max_peaks)
            .map(|peak| peak.period)
            .collect();
        debug!(n = data.len(), ?periods, "seasonality detection finished");
        periods
    }
}

/// Whether `data` is a line up to rounding.
fn is_linear(data: &[f64]) -> bool {
    let center = mean(data);
    let total: f64 = data.iter().map(|v| (v - center).powi(2)).sum();
    let residual: f64 = linear_detrend(data).iter().map(|r| r * r).sum();
    residual <= LINEAR_RESIDUAL_TOLERANCE * total
}

/// Detect up to three periods with the default detector.
pub fn detect_periods(data: &[f64]) -> Vec<usize> {
    SeasonalityDetector::default().detect(data, DEFAULT_MAX_PEAKS)
}
