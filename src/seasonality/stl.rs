//! STL (Seasonal-Trend decomposition using LOESS) implementation.
//!
//! STL decomposes a time series into three components:
//! - Trend: The underlying long-term pattern
//! - Seasonal: The repeating seasonal pattern
//! - Remainder: The residual after removing trend and seasonal
//!
//! The algorithm follows Cleveland et al. (1990): cycle-subseries smoothing
//! with one-step extrapolation at both ends, a moving-average low-pass filter,
//! LOESS trend smoothing, and optional bisquare robustness reweighting between
//! outer passes.

use tracing::debug;

use crate::error::{Result, SeasonalityError};
use crate::smoothing::loess::positions;
use crate::smoothing::{moving_average, LoessSmoother};
use crate::utils::stats::{component_strength, median, next_odd};

/// Residual magnitude below which robustness weights are left at 1.
const DEGENERATE_SCALE: f64 = 1e-10;
/// Lower bound on the bisquare scale, relative to the largest residual.
const SCALE_FLOOR: f64 = 1e-6;

/// Result of STL decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct STLResult {
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Remainder component.
    pub remainder: Vec<f64>,
    /// Robustness weights used in the final pass (all 1.0 unless robust).
    pub weights: Vec<f64>,
    /// Seasonal period the decomposition was fitted with.
    pub period: usize,
}

impl STLResult {
    /// Get the seasonal strength (0 to 1).
    /// Values close to 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        component_strength(&self.seasonal, &self.remainder)
    }

    /// Get the trend strength (0 to 1).
    /// Values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        component_strength(&self.trend, &self.remainder)
    }

    /// Series with the seasonal component removed.
    pub fn seasonally_adjusted(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(self.remainder.iter())
            .map(|(t, r)| t + r)
            .collect()
    }

    /// Series with the trend component removed.
    pub fn detrended(&self) -> Vec<f64> {
        self.seasonal
            .iter()
            .zip(self.remainder.iter())
            .map(|(s, r)| s + r)
            .collect()
    }

    /// Sum of all components; equals the original series.
    pub fn reconstruct(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(self.seasonal.iter())
            .zip(self.remainder.iter())
            .map(|((t, s), r)| t + s + r)
            .collect()
    }
}

/// Builder for [`STLConfig`].
///
/// Smoother spans left unset are derived from the period when
/// [`build`](STLBuilder::build) runs.
#[derive(Debug, Clone, PartialEq)]
pub struct STLBuilder {
    period: usize,
    seasonal_smoother: Option<usize>,
    trend_smoother: Option<usize>,
    low_pass_smoother: Option<usize>,
    iterations: usize,
    inner_iterations: usize,
    robust: bool,
}

impl Default for STLBuilder {
    fn default() -> Self {
        Self {
            period: 12,
            seasonal_smoother: None,
            trend_smoother: None,
            low_pass_smoother: None,
            iterations: 2,
            inner_iterations: 1,
            robust: false,
        }
    }
}

impl STLBuilder {
    /// Seasonal period (at least 2).
    pub fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Seasonal LOESS span (odd, at least `period + 1`).
    pub fn seasonal_smoother(mut self, span: usize) -> Self {
        self.seasonal_smoother = Some(span);
        self
    }

    /// Trend LOESS span (odd, at least 3).
    pub fn trend_smoother(mut self, span: usize) -> Self {
        self.trend_smoother = Some(span);
        self
    }

    /// Low-pass LOESS span (odd, at least 3).
    pub fn low_pass_smoother(mut self, span: usize) -> Self {
        self.low_pass_smoother = Some(span);
        self
    }

    /// Number of outer passes.
    pub fn iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Number of inner loops per outer pass.
    pub fn inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n;
        self
    }

    /// Reweight observations by their remainder between outer passes.
    pub fn robust(mut self, robust: bool) -> Self {
        self.robust = robust;
        self
    }

    /// Validate the parameters and build an immutable configuration.
    pub fn build(self) -> Result<STLConfig> {
        let period = self.period;
        if period < 2 {
            return Err(SeasonalityError::config(format!(
                "seasonal period must be at least 2, got {period}"
            )));
        }
        if self.iterations == 0 {
            return Err(SeasonalityError::config("iterations must be positive"));
        }
        if self.inner_iterations == 0 {
            return Err(SeasonalityError::config("inner_iterations must be positive"));
        }

        let seasonal_smoother = match self.seasonal_smoother {
            Some(span) => {
                validate_span("seasonal_smoother", span)?;
                if span < period + 1 {
                    return Err(SeasonalityError::config(format!(
                        "seasonal_smoother {span} must be at least period + 1 = {}",
                        period + 1
                    )));
                }
                span
            }
            None => next_odd(period + 1),
        };

        let trend_smoother = match self.trend_smoother {
            Some(span) => validate_span("trend_smoother", span)?,
            None => default_trend_span(period, seasonal_smoother),
        };

        let low_pass_smoother = match self.low_pass_smoother {
            Some(span) => validate_span("low_pass_smoother", span)?,
            None => next_odd(period),
        };

        Ok(STLConfig {
            period,
            seasonal_smoother,
            trend_smoother,
            low_pass_smoother,
            iterations: self.iterations,
            inner_iterations: self.inner_iterations,
            robust: self.robust,
        })
    }
}

fn validate_span(name: &str, span: usize) -> Result<usize> {
    if span < 3 || span % 2 == 0 {
        return Err(SeasonalityError::config(format!(
            "{name} must be odd and at least 3, got {span}"
        )));
    }
    Ok(span)
}

/// Cleveland's trend span: smallest odd ≥ 1.5·period / (1 − 1.5/seasonal).
fn default_trend_span(period: usize, seasonal_smoother: usize) -> usize {
    let raw = 1.5 * period as f64 / (1.0 - 1.5 / seasonal_smoother as f64);
    next_odd(raw.ceil() as usize)
}

/// Immutable, validated STL configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct STLConfig {
    period: usize,
    seasonal_smoother: usize,
    trend_smoother: usize,
    low_pass_smoother: usize,
    iterations: usize,
    inner_iterations: usize,
    robust: bool,
}

impl STLConfig {
    /// Start configuring an STL decomposition.
    pub fn builder() -> STLBuilder {
        STLBuilder::default()
    }

    /// Configuration with default spans for `period`.
    pub fn new(period: usize) -> Result<Self> {
        Self::builder().period(period).build()
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn seasonal_smoother(&self) -> usize {
        self.seasonal_smoother
    }

    pub fn trend_smoother(&self) -> usize {
        self.trend_smoother
    }

    pub fn low_pass_smoother(&self) -> usize {
        self.low_pass_smoother
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn inner_iterations(&self) -> usize {
        self.inner_iterations
    }

    pub fn is_robust(&self) -> bool {
        self.robust
    }

    /// Decompose `series` into trend, seasonal and remainder.
    ///
    /// Fails with [`SeasonalityError::InsufficientData`] when the series is
    /// shorter than two full periods.
    pub fn fit(&self, series: &[f64]) -> Result<STLResult> {
        self.fit_weighted(series, None)
    }

    /// Decompose `series` starting from caller-supplied robustness weights.
    ///
    /// The weights multiply every LOESS fit of the first outer pass. Later
    /// passes keep them unless the configuration is robust, in which case
    /// they are recomputed from the remainder as in [`fit`](Self::fit).
    ///
    /// # Example
    /// ```
    /// use anofox_seasonality::seasonality::STLConfig;
    ///
    /// let mut series: Vec<f64> = (0..48)
    ///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
    ///     .collect();
    /// series[20] += 30.0;
    /// let mut weights = vec![1.0; series.len()];
    /// weights[20] = 0.0;
    ///
    /// let result = STLConfig::new(12).unwrap().fit_weighted(&series, Some(&weights)).unwrap();
    /// assert!(result.remainder[20] > 25.0);
    /// ```
    pub fn fit_weighted(&self, series: &[f64], weights: Option<&[f64]>) -> Result<STLResult> {
        let n = series.len();
        let period = self.period;
        if n < 2 * period {
            return Err(SeasonalityError::InsufficientData {
                needed: 2 * period,
                got: n,
            });
        }

        debug!(
            n,
            period,
            iterations = self.iterations,
            robust = self.robust,
            "fitting STL decomposition"
        );

        if let Some(w) = weights {
            if w.len() != n {
                return Err(SeasonalityError::DimensionMismatch {
                    expected: n,
                    got: w.len(),
                });
            }
        }

        let trend_smoother = LoessSmoother::new(self.trend_smoother.min(n))?;
        let mut trend = vec![0.0; n];
        let mut seasonal = vec![0.0; n];
        let weighted = self.robust || weights.is_some();
        let mut weights = weights.map_or_else(|| vec![1.0; n], <[f64]>::to_vec);

        for outer in 0..self.iterations {
            let robustness = weighted.then_some(weights.as_slice());

            for _ in 0..self.inner_iterations {
                seasonal = self.seasonal_pass(series, &trend, robustness)?;

                let deseasonalized: Vec<f64> = series
                    .iter()
                    .zip(seasonal.iter())
                    .map(|(y, s)| y - s)
                    .collect();
                trend = trend_smoother.smooth_series(&deseasonalized, robustness)?;
            }

            if self.robust && outer + 1 < self.iterations {
                weights = robustness_weights(&remainder_of(series, &trend, &seasonal));
            }
        }

        let remainder = remainder_of(series, &trend, &seasonal);

        debug!(n, period, "STL decomposition finished");

        Ok(STLResult {
            trend,
            seasonal,
            remainder,
            weights,
            period,
        })
    }

    /// One seasonal update: cycle-subseries smoothing minus its low-pass.
    fn seasonal_pass(
        &self,
        series: &[f64],
        trend: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let detrended: Vec<f64> = series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();

        let cycle = self.smooth_cycle_subseries(&detrended, weights)?;
        let low_pass = self.low_pass_filter(&cycle)?;

        let period = self.period;
        Ok(low_pass
            .iter()
            .enumerate()
            .map(|(i, l)| cycle[i + period] - l)
            .collect())
    }

    /// Smooth each cycle-subseries and extend it by one step at both ends.
    ///
    /// The output has `n + 2 * period` values; index `i + period` holds the
    /// smoothed value for observation `i`.
    fn smooth_cycle_subseries(&self, detrended: &[f64], weights: Option<&[f64]>) -> Result<Vec<f64>> {
        let n = detrended.len();
        let period = self.period;
        let mut extended = vec![0.0; n + 2 * period];

        for phase in 0..period {
            let values: Vec<f64> = detrended.iter().skip(phase).step_by(period).copied().collect();
            let sub_weights: Option<Vec<f64>> =
                weights.map(|w| w.iter().skip(phase).step_by(period).copied().collect());
            let sub_weights = sub_weights.as_deref();

            let m = values.len();
            let x = positions(m);
            let smoother = LoessSmoother::new(self.seasonal_smoother.min(m))?;

            let smoothed = smoother.smooth(&x, &values, sub_weights)?;
            extended[phase] = smoother.estimate(&x, &values, sub_weights, -1.0)?;
            for (k, value) in smoothed.into_iter().enumerate() {
                extended[(k + 1) * period + phase] = value;
            }
            extended[(m + 1) * period + phase] = smoother.estimate(&x, &values, sub_weights, m as f64)?;
        }

        Ok(extended)
    }

    /// Moving averages of window period, period and 3, then one LOESS pass.
    ///
    /// Maps the `n + 2 * period` extended signal back to `n` values.
    fn low_pass_filter(&self, cycle: &[f64]) -> Result<Vec<f64>> {
        let ma = moving_average(&moving_average(cycle, self.period), self.period);
        let ma = moving_average(&ma, 3);

        let smoother = LoessSmoother::new(self.low_pass_smoother.min(ma.len()))?;
        smoother.smooth_series(&ma, None)
    }
}

impl Default for STLConfig {
    fn default() -> Self {
        let period = 12;
        let seasonal_smoother = next_odd(period + 1);
        Self {
            period,
            seasonal_smoother,
            trend_smoother: default_trend_span(period, seasonal_smoother),
            low_pass_smoother: next_odd(period),
            iterations: 2,
            inner_iterations: 1,
            robust: false,
        }
    }
}

/// Decompose `series` with default STL settings for `period`.
pub fn decompose_stl(series: &[f64], period: usize) -> Result<STLResult> {
    STLConfig::new(period)?.fit(series)
}

pub(crate) fn remainder_of(series: &[f64], trend: &[f64], seasonal: &[f64]) -> Vec<f64> {
    series
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((y, t), s)| y - t - s)
        .collect()
}

/// Bisquare weights of the remainder relative to six median absolute residuals.
///
/// When most residuals vanish the scale is floored relative to the largest
/// residual, so isolated outliers stay down-weighted across passes.
pub(crate) fn robustness_weights(remainder: &[f64]) -> Vec<f64> {
    let abs_remainder: Vec<f64> = remainder.iter().map(|r| r.abs()).collect();
    let max_abs = abs_remainder.iter().copied().fold(0.0, f64::max);
    if !(max_abs > DEGENERATE_SCALE) {
        return vec![1.0; remainder.len()];
    }
    let h = (6.0 * median(&abs_remainder)).max(SCALE_FLOOR * max_abs);

    abs_remainder
        .iter()
        .map(|r| {
            let u = r / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stats::variance;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn generate_seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let trend = 0.1 * i as f64;
                let seasonal = 10.0 * ((2.0 * PI * i as f64 / period as f64).sin());
                trend + seasonal
            })
            .collect()
    }

    fn assert_reconstructs(series: &[f64], result: &STLResult) {
        for (i, (y, r)) in series.iter().zip(result.reconstruct()).enumerate() {
            assert!(
                (y - r).abs() < 1e-9,
                "Reconstruction failed at index {}: {} vs {}",
                i,
                y,
                r
            );
        }
    }

    #[test]
    fn builder_derives_default_spans() {
        let config = STLConfig::new(12).unwrap();
        assert_eq!(config.period(), 12);
        assert_eq!(config.seasonal_smoother(), 13);
        // ceil(18 / (1 - 1.5/13)) = 21
        assert_eq!(config.trend_smoother(), 21);
        assert_eq!(config.low_pass_smoother(), 13);
        assert_eq!(config.iterations(), 2);
        assert_eq!(config.inner_iterations(), 1);
        assert!(!config.is_robust());
        assert_eq!(config, STLConfig::default());

        let odd = STLConfig::new(7).unwrap();
        assert_eq!(odd.seasonal_smoother(), 9);
        assert_eq!(odd.low_pass_smoother(), 7);
    }

    #[test]
    fn builder_rejects_bad_period() {
        for period in [0, 1] {
            assert!(matches!(
                STLConfig::new(period),
                Err(SeasonalityError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn builder_rejects_even_or_small_spans() {
        let even_trend = STLConfig::builder().period(4).trend_smoother(8).build();
        assert!(matches!(even_trend, Err(SeasonalityError::InvalidConfiguration(_))));

        let tiny_low_pass = STLConfig::builder().period(4).low_pass_smoother(1).build();
        assert!(matches!(tiny_low_pass, Err(SeasonalityError::InvalidConfiguration(_))));

        let even_seasonal = STLConfig::builder().period(12).seasonal_smoother(14).build();
        assert!(matches!(even_seasonal, Err(SeasonalityError::InvalidConfiguration(_))));

        let narrow_seasonal = STLConfig::builder().period(12).seasonal_smoother(7).build();
        assert!(matches!(narrow_seasonal, Err(SeasonalityError::InvalidConfiguration(_))));
    }

    #[test]
    fn builder_rejects_zero_iterations() {
        assert!(STLConfig::builder().iterations(0).build().is_err());
        assert!(STLConfig::builder().inner_iterations(0).build().is_err());
    }

    #[test]
    fn stl_basic_decomposition() {
        let period = 12;
        let series = generate_seasonal_series(120, period);

        let result = decompose_stl(&series, period).unwrap();

        assert_eq!(result.trend.len(), series.len());
        assert_eq!(result.seasonal.len(), series.len());
        assert_eq!(result.remainder.len(), series.len());
        assert_eq!(result.weights, vec![1.0; series.len()]);
        assert_eq!(result.period, period);
        assert_reconstructs(&series, &result);
    }

    #[test]
    fn stl_recovers_exact_components() {
        let period = 12;
        let series = generate_seasonal_series(120, period);
        let result = decompose_stl(&series, period).unwrap();

        for i in 0..series.len() {
            let seasonal = 10.0 * (2.0 * PI * i as f64 / period as f64).sin();
            assert_relative_eq!(result.seasonal[i], seasonal, epsilon = 1e-6);
            assert_relative_eq!(result.trend[i], 0.1 * i as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn stl_detects_seasonality() {
        let period = 12;
        let series = generate_seasonal_series(120, period);

        let result = decompose_stl(&series, period).unwrap();

        let strength = result.seasonal_strength();
        assert!(
            strength > 0.9,
            "Expected strong seasonality, got {}",
            strength
        );
    }

    #[test]
    fn stl_seasonal_and_trend_strength_on_short_series() {
        let period = 12;
        let series: Vec<f64> = (0..period * 6)
            .map(|i| 0.05 * i as f64 + (2.0 * PI * i as f64 / period as f64).sin())
            .collect();

        let result = STLConfig::builder()
            .period(period)
            .seasonal_smoother(period + 1)
            .trend_smoother(period * 2 + 1)
            .iterations(2)
            .robust(false)
            .build()
            .unwrap()
            .fit(&series)
            .unwrap();

        assert!(result.seasonal_strength() > 0.7);
        assert!(result.trend_strength() > 0.2);
    }

    #[test]
    fn stl_detects_trend() {
        let n = 120;
        let period = 12;
        // Strong trend with weak seasonality
        let series: Vec<f64> = (0..n)
            .map(|i| {
                let trend = 2.0 * i as f64;
                let seasonal = 0.1 * ((2.0 * PI * i as f64 / period as f64).sin());
                trend + seasonal
            })
            .collect();

        let result = decompose_stl(&series, period).unwrap();

        let strength = result.trend_strength();
        assert!(strength > 0.9, "Expected strong trend, got {}", strength);
    }

    #[test]
    fn stl_trend_only() {
        let n = 100;
        let period = 10;
        // Only trend, no seasonality
        let series: Vec<f64> = (0..n).map(|i| 5.0 + 0.5 * i as f64).collect();

        let result = decompose_stl(&series, period).unwrap();

        // Seasonal component should be small
        let seasonal_var = variance(&result.seasonal);
        let series_var = variance(&series);
        assert!(
            seasonal_var < series_var * 0.1,
            "Seasonal variance {} should be small compared to series variance {}",
            seasonal_var,
            series_var
        );
    }

    #[test]
    fn stl_constant_series() {
        let n = 100;
        let period = 10;
        let series = vec![5.0; n];

        let result = decompose_stl(&series, period).unwrap();

        // All components should be flat/zero
        for &s in &result.seasonal {
            assert!(s.abs() < 1e-6, "Seasonal should be near zero");
        }
        for &r in &result.remainder {
            assert!(r.abs() < 1e-6, "Remainder should be near zero");
        }
        assert_eq!(result.seasonal_strength(), 0.0);
        assert_eq!(result.trend_strength(), 0.0);
    }

    #[test]
    fn stl_insufficient_data() {
        let series = [1.0, 2.0, 3.0];
        let config = STLConfig::builder()
            .period(4)
            .seasonal_smoother(5)
            .trend_smoother(7)
            .build()
            .unwrap();

        assert_eq!(
            config.fit(&series),
            Err(SeasonalityError::InsufficientData { needed: 8, got: 3 })
        );
    }

    #[test]
    fn stl_minimum_length_is_two_periods() {
        let period = 5;
        let series = generate_seasonal_series(2 * period, period);
        let result = decompose_stl(&series, period).unwrap();
        assert_reconstructs(&series, &result);
    }

    #[test]
    fn stl_robust_decomposition() {
        let period = 12;
        let mut series = generate_seasonal_series(120, period);
        // Add outliers
        series[30] = 100.0;
        series[60] = -100.0;

        let result = STLConfig::builder()
            .period(period)
            .iterations(6)
            .robust(true)
            .build()
            .unwrap()
            .fit(&series)
            .unwrap();

        assert_reconstructs(&series, &result);
        assert!(result.weights[30] < 0.1, "outlier should be down-weighted");
        assert!(result.weights[60] < 0.1, "outlier should be down-weighted");

        // Robust fitting should still capture the pattern
        let strength = result.seasonal_strength();
        assert!(
            strength > 0.1,
            "Robust STL should still detect seasonality: {}",
            strength
        );
    }

    #[test]
    fn stl_robust_limits_outlier_leakage() {
        let period = 12;
        let clean = generate_seasonal_series(120, period);
        let mut series = clean.clone();
        series[60] += 80.0;

        let plain = decompose_stl(&series, period).unwrap();
        let robust = STLConfig::builder()
            .period(period)
            .iterations(6)
            .robust(true)
            .build()
            .unwrap()
            .fit(&series)
            .unwrap();

        let error = |r: &STLResult| -> f64 {
            (0..series.len())
                .filter(|&i| i != 60)
                .map(|i| (r.trend[i] + r.seasonal[i] - clean[i]).abs())
                .fold(0.0, f64::max)
        };
        assert!(error(&robust) < error(&plain));
    }

    #[test]
    fn stl_custom_smoothness() {
        let period = 12;
        let series = generate_seasonal_series(120, period);

        let config = STLConfig::builder()
            .period(period)
            .seasonal_smoother(15)
            .trend_smoother(21)
            .low_pass_smoother(13)
            .inner_iterations(3)
            .build()
            .unwrap();

        let result = config.fit(&series).unwrap();
        assert_eq!(result.trend.len(), series.len());
        assert_reconstructs(&series, &result);
    }

    #[test]
    fn stl_different_periods() {
        // Weekly (period 7)
        let series_weekly = generate_seasonal_series(70, 7);
        assert!(decompose_stl(&series_weekly, 7).is_ok());

        // Quarterly (period 4)
        let series_quarterly = generate_seasonal_series(40, 4);
        assert!(decompose_stl(&series_quarterly, 4).is_ok());

        // Smallest period
        let series_pairs = generate_seasonal_series(30, 2);
        assert!(decompose_stl(&series_pairs, 2).is_ok());
    }

    #[test]
    fn stl_derived_series() {
        let period = 12;
        let series = generate_seasonal_series(96, period);
        let result = decompose_stl(&series, period).unwrap();

        let adjusted = result.seasonally_adjusted();
        let detrended = result.detrended();
        for i in 0..series.len() {
            assert_relative_eq!(adjusted[i], series[i] - result.seasonal[i], epsilon = 1e-9);
            assert_relative_eq!(detrended[i], series[i] - result.trend[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn stl_is_deterministic() {
        let period = 7;
        let series: Vec<f64> = (0..84)
            .map(|i| ((i * 13) % 17) as f64 + (2.0 * PI * i as f64 / 7.0).sin())
            .collect();
        let config = STLConfig::builder().period(period).robust(true).iterations(3).build().unwrap();
        assert_eq!(config.fit(&series).unwrap(), config.fit(&series).unwrap());
    }

    #[test]
    fn stl_result_strength_range() {
        let period = 12;
        let series: Vec<f64> = (0..120)
            .map(|i| ((i * 7919) % 101) as f64 / 10.0 + (2.0 * PI * i as f64 / 12.0).cos())
            .collect();

        let result = decompose_stl(&series, period).unwrap();

        for strength in [result.seasonal_strength(), result.trend_strength()] {
            assert!(
                (0.0..=1.0).contains(&strength),
                "Strength should be in [0, 1]: {}",
                strength
            );
        }
    }

    #[test]
    fn robustness_weights_profile() {
        let remainder = [0.0, 0.1, -0.1, 0.1, -0.1, 5.0];
        let weights = robustness_weights(&remainder);
        assert_eq!(weights[0], 1.0);
        assert!(weights[1] > 0.9);
        assert_eq!(weights[5], 0.0);

        assert_eq!(robustness_weights(&[0.0; 4]), vec![1.0; 4]);
    }

    #[test]
    fn robustness_weights_isolate_outlier_on_exact_fit() {
        let mut remainder = vec![1e-13; 20];
        remainder[7] = 50.0;
        let weights = robustness_weights(&remainder);
        assert_eq!(weights[7], 0.0);
        for (i, w) in weights.iter().enumerate() {
            if i != 7 {
                assert!(*w > 0.999);
            }
        }
    }

    #[test]
    fn stl_fit_weighted_ignores_zero_weight_points() {
        let period = 12;
        let clean = generate_seasonal_series(96, period);
        let mut series = clean.clone();
        series[40] += 200.0;
        let mut weights = vec![1.0; series.len()];
        weights[40] = 0.0;

        let config = STLConfig::new(period).unwrap();
        let weighted = config.fit_weighted(&series, Some(&weights)).unwrap();
        let plain = config.fit(&series).unwrap();

        assert!(weighted.remainder[40] > 190.0);
        assert_eq!(weighted.weights, weights);
        let leak = |result: &STLResult| {
            (0..series.len())
                .filter(|&i| i != 40)
                .map(|i| (result.trend[i] + result.seasonal[i] - clean[i]).abs())
                .fold(0.0, f64::max)
        };
        assert!(leak(&weighted) < 1.0, "weighted leak {}", leak(&weighted));
        assert!(leak(&plain) > 5.0, "plain leak {}", leak(&plain));
        assert_reconstructs(&series, &weighted);
    }

    #[test]
    fn stl_fit_weighted_without_weights_matches_fit() {
        let series = generate_seasonal_series(72, 12);
        let config = STLConfig::new(12).unwrap();
        assert_eq!(config.fit_weighted(&series, None).unwrap(), config.fit(&series).unwrap());
    }

    #[test]
    fn stl_fit_weighted_rejects_wrong_weight_length() {
        let series = generate_seasonal_series(48, 12);
        let err = STLConfig::new(12)
            .unwrap()
            .fit_weighted(&series, Some(&[1.0; 10]))
            .unwrap_err();
        assert_eq!(
            err,
            SeasonalityError::DimensionMismatch {
                expected: 48,
                got: 10
            }
        );
    }
}
