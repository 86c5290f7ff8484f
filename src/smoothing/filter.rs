//! Moving-average filters.

/// Valid-mode moving average.
///
/// Each output is the mean of `window` consecutive inputs, so the result has
/// `len - window + 1` elements. Returns an empty vector when `window` is 0 or
/// longer than the input.
///
/// # Example
/// ```
/// use anofox_seasonality::smoothing::moving_average;
///
/// let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
/// assert_eq!(ma, vec![2.0, 3.0, 4.0]);
/// ```
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 || window > n {
        return Vec::new();
    }

    let w = window as f64;
    let mut result = Vec::with_capacity(n - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    result.push(sum / w);

    for i in window..n {
        sum += values[i] - values[i - window];
        result.push(sum / w);
    }

    result
}
