//! LOESS (locally weighted linear regression) smoother.
//!
//! For every target position the smoother selects the `span` nearest samples,
//! weights them with a tricube kernel scaled to the farthest selected sample,
//! and evaluates a weighted least-squares line at the target. Boundary targets
//! use a one-sided window; data is never reflected.

use crate::error::{Result, SeasonalityError};

/// Distances within this fraction of the bandwidth get full weight.
const NEAR_FRACTION: f64 = 0.001;
/// Distances beyond this fraction of the bandwidth get zero weight.
const FAR_FRACTION: f64 = 0.999;

/// Degree-1 LOESS smoother with a fixed neighbourhood size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoessSmoother {
    span: usize,
}

impl LoessSmoother {
    /// Create a smoother using `span` neighbouring points per local fit.
    ///
    /// Fails with [`SeasonalityError::InvalidConfiguration`] when `span < 2`.
    pub fn new(span: usize) -> Result<Self> {
        if span < 2 {
            return Err(SeasonalityError::config(format!(
                "smoother span must be at least 2, got {span}"
            )));
        }
        Ok(Self { span })
    }

    /// Number of neighbouring points in each local fit.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Smooth `y` observed at ascending positions `x`.
    ///
    /// Optional `robustness` weights (one per sample) multiply the tricube
    /// kernel weights.
    ///
    /// # Example
    /// ```
    /// use anofox_seasonality::smoothing::LoessSmoother;
    ///
    /// let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
    /// let y: Vec<f64> = x.iter().map(|v| 3.0 + 0.5 * v).collect();
    /// let smoothed = LoessSmoother::new(5).unwrap().smooth(&x, &y, None).unwrap();
    /// assert!((smoothed[4] - y[4]).abs() < 1e-10);
    /// ```
    pub fn smooth(&self, x: &[f64], y: &[f64], robustness: Option<&[f64]>) -> Result<Vec<f64>> {
        self.check_inputs(x, y, robustness)?;

        let mut result = Vec::with_capacity(x.len());
        let mut left = 0;
        for (i, &target) in x.iter().enumerate() {
            // Targets are ascending, so the window only ever slides right.
            left = self.window_start(x, target, left);
            let value = self.fit_window(x, y, robustness, target, left).unwrap_or(y[i]);
            result.push(value);
        }

        Ok(result)
    }

    /// Evaluate the local fit at an arbitrary `target`, which may lie outside
    /// the sampled range (used for one-step extrapolation).
    pub fn estimate(
        &self,
        x: &[f64],
        y: &[f64],
        robustness: Option<&[f64]>,
        target: f64,
    ) -> Result<f64> {
        self.check_inputs(x, y, robustness)?;

        let left = self.window_start(x, target, 0);
        Ok(self
            .fit_window(x, y, robustness, target, left)
            .unwrap_or_else(|| y[nearest_index(x, target, left, self.span)]))
    }

    /// Smooth values sampled at positions `0, 1, 2, ...`.
    pub fn smooth_series(&self, y: &[f64], robustness: Option<&[f64]>) -> Result<Vec<f64>> {
        let x = positions(y.len());
        self.smooth(&x, y, robustness)
    }

    fn check_inputs(&self, x: &[f64], y: &[f64], robustness: Option<&[f64]>) -> Result<()> {
        if x.len() != y.len() {
            return Err(SeasonalityError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if let Some(weights) = robustness {
            if weights.len() != x.len() {
                return Err(SeasonalityError::DimensionMismatch {
                    expected: x.len(),
                    got: weights.len(),
                });
            }
        }
        if self.span > x.len() {
            return Err(SeasonalityError::config(format!(
                "smoother span {} exceeds {} available samples",
                self.span,
                x.len()
            )));
        }
        Ok(())
    }

    /// Leftmost index of the `span` nearest neighbours of `target`.
    ///
    /// Equal distances keep the lower index.
    fn window_start(&self, x: &[f64], target: f64, mut left: usize) -> usize {
        let n = x.len();
        while left + self.span < n && x[left + self.span] - target < target - x[left] {
            left += 1;
        }
        left
    }

    /// Weighted local linear fit over `x[left..left + span]`.
    ///
    /// Returns `None` when every weight in the window vanishes.
    fn fit_window(
        &self,
        x: &[f64],
        y: &[f64],
        robustness: Option<&[f64]>,
        target: f64,
        left: usize,
    ) -> Option<f64> {
        let right = left + self.span;
        let bandwidth = (target - x[left]).max(x[right - 1] - target);

        let mut weights = Vec::with_capacity(self.span);
        let mut total = 0.0;
        for j in left..right {
            let w = tricube((x[j] - target).abs(), bandwidth)
                * robustness.map_or(1.0, |r| r[j]);
            weights.push(w);
            total += w;
        }

        if total <= 0.0 {
            return None;
        }
        for w in weights.iter_mut() {
            *w /= total;
        }

        let center: f64 = weights
            .iter()
            .zip(&x[left..right])
            .map(|(w, xj)| w * xj)
            .sum();
        let spread: f64 = weights
            .iter()
            .zip(&x[left..right])
            .map(|(w, xj)| w * (xj - center).powi(2))
            .sum();

        // Fall back to the weighted mean when the design has no leverage.
        let range = x[x.len() - 1] - x[0];
        if spread.sqrt() > NEAR_FRACTION * range {
            let slope = (target - center) / spread;
            for (w, xj) in weights.iter_mut().zip(&x[left..right]) {
                *w *= 1.0 + slope * (xj - center);
            }
        }

        Some(
            weights
                .iter()
                .zip(&y[left..right])
                .map(|(w, yj)| w * yj)
                .sum(),
        )
    }
}

/// Tricube kernel of `distance` scaled by `bandwidth`.
fn tricube(distance: f64, bandwidth: f64) -> f64 {
    if bandwidth <= 0.0 || distance <= NEAR_FRACTION * bandwidth {
        return 1.0;
    }
    if distance > FAR_FRACTION * bandwidth {
        return 0.0;
    }
    let u = distance / bandwidth;
    (1.0 - u.powi(3)).powi(3)
}

fn nearest_index(x: &[f64], target: f64, left: usize, span: usize) -> usize {
    (left..left + span)
        .min_by(|&a, &b| {
            (x[a] - target)
                .abs()
                .partial_cmp(&(x[b] - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(left)
}

/// Positions `0.0, 1.0, ..., n - 1` for evenly spaced samples.
pub(crate) fn positions(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}
