//! End-to-end seasonality analysis: detect periods, then decompose.
//!
//! The analyzer picks the decomposition from what the detector finds: a broad
//! LOESS trend when nothing is periodic, STL for a single period, and MSTL when
//! several periods compete.

use tracing::{debug, instrument};

use super::mstl::{MSTLConfig, MSTLResult};
use super::stl::{STLConfig, STLResult};
use crate::detection::{SeasonalityDetector, DEFAULT_MAX_PEAKS};
use crate::error::{Result, SeasonalityError};
use crate::smoothing::LoessSmoother;
use crate::utils::stats::{component_strength, next_odd};

/// Shortest series the analyzer accepts.
const MIN_LENGTH: usize = 3;
/// Seasonal strength above which a series counts as seasonal.
const SEASONAL_STRENGTH_FLOOR: f64 = 0.1;

/// Decomposition chosen by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub enum Decomposition {
    /// No period detected: a smooth trend and what is left over.
    TrendOnly { trend: Vec<f64>, remainder: Vec<f64> },
    /// Single-period STL.
    Stl(STLResult),
    /// Multi-period MSTL.
    Mstl(MSTLResult),
}

impl Decomposition {
    pub fn trend(&self) -> &[f64] {
        match self {
            Decomposition::TrendOnly { trend, .. } => trend,
            Decomposition::Stl(result) => &result.trend,
            Decomposition::Mstl(result) => &result.trend,
        }
    }

    pub fn remainder(&self) -> &[f64] {
        match self {
            Decomposition::TrendOnly { remainder, .. } => remainder,
            Decomposition::Stl(result) => &result.remainder,
            Decomposition::Mstl(result) => &result.remainder,
        }
    }

    /// Seasonal arrays, one per period; empty for [`Decomposition::TrendOnly`].
    pub fn seasonal(&self) -> Vec<&[f64]> {
        match self {
            Decomposition::TrendOnly { .. } => Vec::new(),
            Decomposition::Stl(result) => vec![result.seasonal.as_slice()],
            Decomposition::Mstl(result) => result
                .seasonal_components
                .iter()
                .map(Vec::as_slice)
                .collect(),
        }
    }

    /// Periods of the seasonal arrays, in the same order.
    pub fn periods(&self) -> Vec<usize> {
        match self {
            Decomposition::TrendOnly { .. } => Vec::new(),
            Decomposition::Stl(result) => vec![result.period],
            Decomposition::Mstl(result) => result.seasonal_periods.clone(),
        }
    }

    /// Borrowed view over the components.
    pub fn components(&self) -> SeasonalityComponents<'_> {
        SeasonalityComponents {
            trend: self.trend(),
            seasonal: self.seasonal(),
            remainder: self.remainder(),
        }
    }
}

/// Borrowed trend, seasonal and remainder arrays of a decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityComponents<'a> {
    pub trend: &'a [f64],
    pub seasonal: Vec<&'a [f64]>,
    pub remainder: &'a [f64],
}

impl SeasonalityComponents<'_> {
    /// Elementwise sum of all seasonal arrays, zeros when there are none.
    pub fn aggregate_seasonal(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.trend.len()];
        for component in &self.seasonal {
            for (t, s) in total.iter_mut().zip(component.iter()) {
                *t += s;
            }
        }
        total
    }

    /// Sum of all components; equals the analyzed series.
    pub fn reconstruct(&self) -> Vec<f64> {
        self.aggregate_seasonal()
            .iter()
            .zip(self.trend.iter())
            .zip(self.remainder.iter())
            .map(|((s, t), r)| s + t + r)
            .collect()
    }
}

/// Outcome of [`SeasonalityAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityAnalysis {
    /// Detected periods, strongest first.
    pub detected_periods: Vec<usize>,
    /// Primary period (the strongest), if any.
    pub selected_period: Option<usize>,
    pub decomposition: Decomposition,
    /// Strength of the aggregated seasonal, in `[0, 1]`.
    pub seasonal_strength: f64,
    /// Strength of the trend, in `[0, 1]`.
    pub trend_strength: f64,
    /// `(period, strength)` for each seasonal component.
    pub period_strengths: Vec<(usize, f64)>,
}

impl SeasonalityAnalysis {
    pub fn components(&self) -> SeasonalityComponents<'_> {
        self.decomposition.components()
    }

    /// A period was selected and its seasonal explains a noticeable share.
    pub fn is_seasonal(&self) -> bool {
        self.selected_period.is_some() && self.seasonal_strength > SEASONAL_STRENGTH_FLOOR
    }

    /// Check if strong seasonality was detected.
    pub fn is_strong(&self) -> bool {
        self.seasonal_strength >= 0.7
    }

    /// Check if moderate or stronger seasonality was detected.
    pub fn is_moderate(&self) -> bool {
        self.seasonal_strength >= 0.4
    }
}

/// Detects seasonal periods and decomposes the series accordingly.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityAnalyzer {
    detector: SeasonalityDetector,
    max_peaks: usize,
}

impl Default for SeasonalityAnalyzer {
    fn default() -> Self {
        Self::new(SeasonalityDetector::default())
    }
}

impl SeasonalityAnalyzer {
    pub fn new(detector: SeasonalityDetector) -> Self {
        Self {
            detector,
            max_peaks: DEFAULT_MAX_PEAKS,
        }
    }

    /// Limit the number of detected periods handed to the decomposition.
    pub fn with_max_peaks(mut self, max_peaks: usize) -> Self {
        self.max_peaks = max_peaks;
        self
    }

    pub fn detector(&self) -> &SeasonalityDetector {
        &self.detector
    }

    pub fn max_peaks(&self) -> usize {
        self.max_peaks
    }

    /// Analyze `series`, using `override_period` instead of detection when given.
    ///
    /// # Example
    /// ```
    /// use anofox_seasonality::seasonality::SeasonalityAnalyzer;
    ///
    /// let series: Vec<f64> = (0..96)
    ///     .map(|i| 10.0 + (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
    ///     .collect();
    /// let analysis = SeasonalityAnalyzer::default().analyze(&series, Some(12)).unwrap();
    /// assert_eq!(analysis.selected_period, Some(12));
    /// assert!(analysis.is_strong());
    /// ```
    #[instrument(skip(self, series), fields(n = series.len()))]
    pub fn analyze(
        &self,
        series: &[f64],
        override_period: Option<usize>,
    ) -> Result<SeasonalityAnalysis> {
        let n = series.len();
        if n == 0 {
            return Err(SeasonalityError::EmptyData);
        }
        if n < MIN_LENGTH {
            return Err(SeasonalityError::InsufficientData {
                needed: MIN_LENGTH,
                got: n,
            });
        }

        let detected_periods = match override_period {
            Some(period) => vec![period],
            None => self.detector.detect(series, self.max_peaks),
        };

        let decomposition = match detected_periods.as_slice() {
            [] => trend_only(series)?,
            [period] => Decomposition::Stl(single_period(series, *period)?),
            periods => {
                let mut ascending = periods.to_vec();
                ascending.sort_unstable();
                let result = MSTLConfig::builder()
                    .periods(ascending)
                    .iterations(2)
                    .robust(false)
                    .build()?
                    .fit(series)?;
                Decomposition::Mstl(result)
            }
        };

        let components = decomposition.components();
        let seasonal = components.aggregate_seasonal();
        let seasonal_strength = component_strength(&seasonal, components.remainder);
        let trend_strength = component_strength(components.trend, components.remainder);
        let period_strengths = decomposition
            .periods()
            .into_iter()
            .zip(components.seasonal.iter())
            .map(|(period, s)| (period, component_strength(s, components.remainder)))
            .collect();

        debug!(
            ?detected_periods,
            seasonal_strength, trend_strength, "seasonality analysis finished"
        );

        Ok(SeasonalityAnalysis {
            selected_period: detected_periods.first().copied(),
            detected_periods,
            decomposition,
            seasonal_strength,
            trend_strength,
            period_strengths,
        })
    }
}

/// STL for one period, with a trend span wide enough to ignore the cycle.
fn single_period(series: &[f64], period: usize) -> Result<STLResult> {
    STLConfig::builder()
        .period(period)
        .trend_smoother(next_odd((3 * period).max(7)))
        .build()?
        .fit(series)
}

fn trend_only(series: &[f64]) -> Result<Decomposition> {
    let n = series.len();
    let span = next_odd(n.div_ceil(3)).min(n);
    let trend = LoessSmoother::new(span)?.smooth_series(series, None)?;
    let remainder = series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();
    Ok(Decomposition::TrendOnly { trend, remainder })
}

/// Analyze `series` with the default detector.
pub fn analyze_seasonality(series: &[f64]) -> Result<SeasonalityAnalysis> {
    SeasonalityAnalyzer::default().analyze(series, None)
}
