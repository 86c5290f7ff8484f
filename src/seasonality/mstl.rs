//! MSTL (Multiple Seasonal-Trend decomposition using LOESS) implementation.
//!
//! MSTL extends STL to handle multiple seasonal periods, such as daily and weekly
//! patterns in hourly data. Each outer round refits every seasonal component in
//! configured order against the series minus the trend and the other seasonals,
//! then re-smooths the trend once. In robust mode a single set of bisquare
//! weights, derived from the MSTL remainder after each round, feeds every
//! LOESS fit of the next round.

use tracing::debug;

use super::stl::{robustness_weights, STLConfig};
use crate::error::{Result, SeasonalityError};
use crate::smoothing::LoessSmoother;
use crate::utils::stats::{component_strength, next_odd};

/// Inner loops of each per-period STL fit.
const INNER_ITERATIONS: usize = 2;

/// Result of MSTL decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct MSTLResult {
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal components (one for each period, in configured order).
    pub seasonal_components: Vec<Vec<f64>>,
    /// The seasonal periods corresponding to each component.
    pub seasonal_periods: Vec<usize>,
    /// Remainder component.
    pub remainder: Vec<f64>,
    /// Robustness weights used in the final round (all 1.0 unless robust).
    pub weights: Vec<f64>,
}

impl MSTLResult {
    /// Get the total seasonal component (sum of all seasonal components).
    pub fn total_seasonal(&self) -> Vec<f64> {
        let n = self.trend.len();
        let mut total = vec![0.0; n];
        for component in &self.seasonal_components {
            for (t, s) in total.iter_mut().zip(component.iter()) {
                *t += s;
            }
        }
        total
    }

    /// Get seasonal strength for a specific component index.
    pub fn seasonal_strength(&self, period_idx: usize) -> Option<f64> {
        self.seasonal_components
            .get(period_idx)
            .map(|seasonal| component_strength(seasonal, &self.remainder))
    }

    /// Seasonal strength of the combined seasonal signal.
    pub fn total_seasonal_strength(&self) -> f64 {
        component_strength(&self.total_seasonal(), &self.remainder)
    }

    /// Get trend strength.
    pub fn trend_strength(&self) -> f64 {
        component_strength(&self.trend, &self.remainder)
    }

    /// Series with every seasonal component removed.
    pub fn seasonally_adjusted(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(self.remainder.iter())
            .map(|(t, r)| t + r)
            .collect()
    }

    /// Series with the trend component removed.
    pub fn detrended(&self) -> Vec<f64> {
        self.total_seasonal()
            .iter()
            .zip(self.remainder.iter())
            .map(|(s, r)| s + r)
            .collect()
    }

    /// Sum of all components; equals the original series.
    pub fn reconstruct(&self) -> Vec<f64> {
        self.total_seasonal()
            .iter()
            .zip(self.trend.iter())
            .zip(self.remainder.iter())
            .map(|((s, t), r)| s + t + r)
            .collect()
    }
}

/// Builder for [`MSTLConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct MSTLBuilder {
    periods: Vec<usize>,
    iterations: usize,
    robust: bool,
}

impl Default for MSTLBuilder {
    fn default() -> Self {
        Self {
            periods: vec![7],
            iterations: 2,
            robust: false,
        }
    }
}

impl MSTLBuilder {
    /// Seasonal periods, processed in the given order.
    pub fn periods(mut self, periods: Vec<usize>) -> Self {
        self.periods = periods;
        self
    }

    /// Number of outer rounds.
    pub fn iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Down-weight outlying observations between rounds.
    pub fn robust(mut self, robust: bool) -> Self {
        self.robust = robust;
        self
    }

    /// Validate the parameters and build an immutable configuration.
    pub fn build(self) -> Result<MSTLConfig> {
        if self.periods.is_empty() {
            return Err(SeasonalityError::config(
                "MSTL requires at least one seasonal period",
            ));
        }
        if let Some(&period) = self.periods.iter().find(|&&p| p < 2) {
            return Err(SeasonalityError::config(format!(
                "seasonal period must be at least 2, got {period}"
            )));
        }
        for (i, period) in self.periods.iter().enumerate() {
            if self.periods[..i].contains(period) {
                return Err(SeasonalityError::config(format!(
                    "duplicate seasonal period {period}"
                )));
            }
        }
        if self.iterations == 0 {
            return Err(SeasonalityError::config("iterations must be positive"));
        }

        // Inner STL configs are validated here so `fit` cannot hit a bad span.
        let stl_configs = self
            .periods
            .iter()
            .map(|&period| {
                STLConfig::builder()
                    .period(period)
                    .iterations(1)
                    .inner_iterations(INNER_ITERATIONS)
                    .build()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MSTLConfig {
            periods: self.periods,
            iterations: self.iterations,
            robust: self.robust,
            stl_configs,
        })
    }
}

/// Immutable, validated MSTL configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MSTLConfig {
    periods: Vec<usize>,
    iterations: usize,
    robust: bool,
    stl_configs: Vec<STLConfig>,
}

impl MSTLConfig {
    /// Start configuring an MSTL decomposition.
    pub fn builder() -> MSTLBuilder {
        MSTLBuilder::default()
    }

    /// Configuration with default settings for `periods`.
    pub fn new(periods: Vec<usize>) -> Result<Self> {
        Self::builder().periods(periods).build()
    }

    /// Get the seasonal periods, in processing order.
    pub fn periods(&self) -> &[usize] {
        &self.periods
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn is_robust(&self) -> bool {
        self.robust
    }

    /// LOESS span used for the shared trend: smallest odd ≥ 2·max period.
    pub fn trend_smoother(&self) -> usize {
        next_odd(2 * self.max_period())
    }

    fn max_period(&self) -> usize {
        self.periods.iter().copied().max().unwrap_or(2)
    }

    /// Decompose `series` into trend, one seasonal per period, and remainder.
    ///
    /// Fails with [`SeasonalityError::InsufficientData`] when the series is
    /// shorter than two cycles of the longest period.
    pub fn fit(&self, series: &[f64]) -> Result<MSTLResult> {
        let n = series.len();
        let max_period = self.max_period();
        if n < 2 * max_period {
            return Err(SeasonalityError::InsufficientData {
                needed: 2 * max_period,
                got: n,
            });
        }

        debug!(
            n,
            periods = ?self.periods,
            iterations = self.iterations,
            robust = self.robust,
            "fitting MSTL decomposition"
        );

        let trend_smoother = LoessSmoother::new(self.trend_smoother().min(n))?;
        let mut seasonal_components: Vec<Vec<f64>> = vec![vec![0.0; n]; self.periods.len()];
        let mut trend = vec![0.0; n];
        let mut weights = vec![1.0; n];

        for round in 0..self.iterations {
            let robustness = self.robust.then_some(weights.as_slice());

            for (s_idx, stl) in self.stl_configs.iter().enumerate() {
                // Remove trend and other seasonal components
                let mut working: Vec<f64> =
                    series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();
                for (other_idx, other_seasonal) in seasonal_components.iter().enumerate() {
                    if other_idx != s_idx {
                        for (w, s) in working.iter_mut().zip(other_seasonal.iter()) {
                            *w -= s;
                        }
                    }
                }

                seasonal_components[s_idx] = stl.fit_weighted(&working, robustness)?.seasonal;
            }

            let mut deseasonalized = series.to_vec();
            for seasonal in &seasonal_components {
                for (d, s) in deseasonalized.iter_mut().zip(seasonal.iter()) {
                    *d -= s;
                }
            }
            trend = trend_smoother.smooth_series(&deseasonalized, robustness)?;

            if self.robust && round + 1 < self.iterations {
                weights = robustness_weights(&remainder_of(series, &trend, &seasonal_components));
            }
        }

        let remainder = remainder_of(series, &trend, &seasonal_components);

        debug!(n, periods = ?self.periods, "MSTL decomposition finished");

        Ok(MSTLResult {
            trend,
            seasonal_components,
            seasonal_periods: self.periods.clone(),
            remainder,
            weights,
        })
    }
}

fn remainder_of(series: &[f64], trend: &[f64], seasonal_components: &[Vec<f64>]) -> Vec<f64> {
    let mut remainder: Vec<f64> = series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();
    for seasonal in seasonal_components {
        for (r, s) in remainder.iter_mut().zip(seasonal.iter()) {
            *r -= s;
        }
    }
    remainder
}

/// Decompose `series` with default MSTL settings for `periods`.
pub fn decompose_mstl(series: &[f64], periods: Vec<usize>) -> Result<MSTLResult> {
    MSTLConfig::new(periods)?.fit(series)
}
