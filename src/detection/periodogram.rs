//! Least-squares periodogram over integer candidate periods.
//!
//! The power of a period `p` is the fraction of the centred series' variance
//! explained by the best-fitting sinusoid `a·sin(2πi/p) + b·cos(2πi/p)`.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::error::{Result, SeasonalityError};

/// Relative determinant below which the sin/cos design is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Candidate periods paired with their explained-variance power.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Periodogram {
    /// Candidate periods, ascending.
    pub periods: Vec<usize>,
    /// Power in `[0, 1]` for each period.
    pub powers: Vec<f64>,
}

/// A local maximum of the periodogram above a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodogramPeak {
    /// Period at the peak.
    pub period: usize,
    /// Power at the peak.
    pub power: f64,
    /// Neighbouring candidate period below the peak, if any.
    pub prev_period: Option<usize>,
    /// Neighbouring candidate period above the peak, if any.
    pub next_period: Option<usize>,
}

impl Periodogram {
    /// Build a periodogram from parallel arrays.
    pub fn new(periods: Vec<usize>, powers: Vec<f64>) -> Result<Self> {
        if periods.len() != powers.len() {
            return Err(SeasonalityError::DimensionMismatch {
                expected: periods.len(),
                got: powers.len(),
            });
        }
        Ok(Self { periods, powers })
    }

    /// Scan every integer period in `[min_period, max_period]`.
    ///
    /// Returns an empty periodogram when the series has zero variance.
    pub(crate) fn compute(data: &[f64], min_period: usize, max_period: usize) -> Self {
        let n = data.len();
        let mut result = Self::default();
        if n == 0 || max_period < min_period {
            return result;
        }

        let mean = data.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = data.iter().map(|v| v - mean).collect();
        let total: f64 = centered.iter().map(|v| v * v).sum();
        if total <= 0.0 {
            return result;
        }

        result.periods.reserve(max_period - min_period + 1);
        result.powers.reserve(max_period - min_period + 1);
        for period in min_period..=max_period {
            result.periods.push(period);
            result.powers.push(sinusoid_power(&centered, total, period));
        }
        result
    }

    /// Number of candidate periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the periodogram holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterate over `(period, power)` pairs in increasing period order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.periods.iter().copied().zip(self.powers.iter().copied())
    }

    /// Power of a specific period, if it was scanned.
    pub fn power_at(&self, period: usize) -> Option<f64> {
        self.iter().find(|&(p, _)| p == period).map(|(_, power)| power)
    }

    /// Local maxima whose power strictly exceeds `threshold`.
    ///
    /// A candidate must be at least as strong as each existing neighbour;
    /// endpoints are compared against their single neighbour only. Peaks are
    /// ordered by descending power, ties going to the smaller period.
    ///
    /// # Example
    /// ```
    /// use anofox_seasonality::detection::Periodogram;
    ///
    /// let pg = Periodogram::new(vec![2, 3, 4, 5], vec![0.1, 0.4, 0.8, 0.2]).unwrap();
    /// let peaks = pg.peaks(0.5);
    /// assert_eq!(peaks.len(), 1);
    /// assert_eq!(peaks[0].period, 4);
    /// ```
    pub fn peaks(&self, threshold: f64) -> Vec<PeriodogramPeak> {
        let n = self.periods.len().min(self.powers.len());
        let mut peaks = Vec::new();

        for i in 0..n {
            let power = self.powers[i];
            if !(power > threshold) {
                continue;
            }
            let above_prev = i == 0 || power >= self.powers[i - 1];
            let above_next = i + 1 >= n || power >= self.powers[i + 1];
            if above_prev && above_next {
                peaks.push(PeriodogramPeak {
                    period: self.periods[i],
                    power,
                    prev_period: i.checked_sub(1).map(|j| self.periods[j]),
                    next_period: (i + 1 < n).then(|| self.periods[i + 1]),
                });
            }
        }

        peaks.sort_by(|a, b| {
            b.power
                .partial_cmp(&a.power)
                .unwrap_or(Ordering::Equal)
                .then(a.period.cmp(&b.period))
        });
        peaks
    }
}

/// Explained-variance fraction of the least-squares sinusoid of `period`.
fn sinusoid_power(centered: &[f64], total: f64, period: usize) -> f64 {
    let omega = 2.0 * PI / period as f64;

    let (mut ss, mut cc, mut sc, mut sy, mut cy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (i, &y) in centered.iter().enumerate() {
        let (s, c) = (omega * i as f64).sin_cos();
        ss += s * s;
        cc += c * c;
        sc += s * c;
        sy += s * y;
        cy += c * y;
    }

    // A regressor that is zero up to rounding (sin at p = 2) must not be fitted.
    let floor = SINGULAR_TOLERANCE * centered.len() as f64;
    let sin_live = ss > floor;
    let cos_live = cc > floor;

    // Explained sum of squares of the fitted values equals beta' X'y.
    let det = ss * cc - sc * sc;
    let explained = if sin_live && cos_live && det > SINGULAR_TOLERANCE * ss * cc {
        let a = (cc * sy - sc * cy) / det;
        let b = (ss * cy - sc * sy) / det;
        a * sy + b * cy
    } else if sin_live && (!cos_live || ss >= cc) {
        sy * sy / ss
    } else if cos_live {
        cy * cy / cc
    } else {
        0.0
    };

    (explained / total).clamp(0.0, 1.0)
}
