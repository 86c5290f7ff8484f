//! Statistical utility functions shared by the decomposition modules.

/// Variance below which a strength denominator is treated as degenerate.
const DEGENERATE_VARIANCE: f64 = 1e-10;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the sample variance of a slice (n-1 denominator).
///
/// Returns 0.0 for fewer than two values so that strength ratios
/// degrade to their clamped value instead of propagating NaN.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Root mean square of a slice.
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Fraction of `component + remainder` variance not explained by the remainder.
///
/// Computes `max(0, 1 - Var(remainder) / Var(component + remainder))`,
/// clamped to `[0, 1]`. A degenerate denominator yields 0.
pub fn component_strength(component: &[f64], remainder: &[f64]) -> f64 {
    let combined: Vec<f64> = component
        .iter()
        .zip(remainder.iter())
        .map(|(c, r)| c + r)
        .collect();
    let var_combined = variance(&combined);
    if !var_combined.is_finite() || var_combined < DEGENERATE_VARIANCE {
        return 0.0;
    }

    let ratio = variance(remainder) / var_combined;
    if !ratio.is_finite() {
        return 0.0;
    }
    (1.0 - ratio).clamp(0.0, 1.0)
}

/// Residuals of `values` after removing the least-squares line over `0..n`.
pub fn linear_detrend(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

    values
        .iter()
        .enumerate()
        .map(|(i, y)| y - y_mean - slope * (i as f64 - x_mean))
        .collect()
}

/// Smallest odd integer greater than or equal to `value`, floored at 3.
pub fn next_odd(value: usize) -> usize {
    let odd = if value % 2 == 0 { value + 1 } else { value };
    odd.max(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_variance() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(mean(&values), 3.0);
        assert_relative_eq!(variance(&values), 2.5);
    }

    #[test]
    fn variance_of_short_slice_is_zero() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[42.0]), 0.0);
    }

    #[test]
    fn median_odd_and_even() {
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn rms_of_unit_square_wave() {
        assert_relative_eq!(rms(&[1.0, -1.0, 1.0, -1.0]), 1.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn component_strength_perfect_component() {
        let component = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let remainder = [0.0; 6];
        assert_relative_eq!(component_strength(&component, &remainder), 1.0);
    }

    #[test]
    fn component_strength_degenerate_is_zero() {
        let component = [0.0; 5];
        let remainder = [0.0; 5];
        assert_eq!(component_strength(&component, &remainder), 0.0);
    }

    #[test]
    fn component_strength_noise_only_is_zero() {
        let component = [0.0; 4];
        let remainder = [0.5, -0.5, 0.3, -0.3];
        assert_eq!(component_strength(&component, &remainder), 0.0);
    }

    #[test]
    fn next_odd_rounds_up() {
        assert_eq!(next_odd(0), 3);
        assert_eq!(next_odd(4), 5);
        assert_eq!(next_odd(7), 7);
        assert_eq!(next_odd(12), 13);
    }

    #[test]
    fn linear_detrend_removes_line() {
        let values: Vec<f64> = (0..20).map(|i| 4.0 - 0.3 * i as f64).collect();
        for r in linear_detrend(&values) {
            assert!(r.abs() < 1e-12);
        }
        assert!(linear_detrend(&[]).is_empty());
        assert_eq!(linear_detrend(&[5.0]), vec![0.0]);
    }

    #[test]
    fn linear_detrend_keeps_zero_mean_wiggle() {
        let values = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let detrended = linear_detrend(&values);
        assert!(mean(&detrended).abs() < 1e-12);
        assert!(detrended[0] > 0.5 && detrended[1] < -0.5);
    }
}
