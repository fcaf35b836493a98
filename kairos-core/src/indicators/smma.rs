//! Smoothed Moving Average (SMMA).
//!
//! SMMA[i] = (SMMA[i-1] * (period - 1) + x[i]) / period
//! Seed: arithmetic mean of the first `period` values, placed at index period-1.

/// SMMA of an arbitrary series, aligned with the input (warm-up is NaN).
pub fn smma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = prev;

    let weight = (period - 1) as f64;
    for i in period..n {
        prev = (prev * weight + values[i]) / period as f64;
        result[i] = prev;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn smma_seed_is_mean() {
        let result = smma_of_series(&[0.0, 1.0, 2.0, 3.0, 4.0], 5);
        assert!(result[..4].iter().all(|v| v.is_nan()));
        assert_approx(result[4], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn smma_recursion() {
        // seed 2.0, then (2.0*4 + 5)/5 = 2.6, (2.6*4 + 6)/5 = 3.28
        let values: Vec<f64> = (0..7).map(f64::from).collect();
        let result = smma_of_series(&values, 5);
        assert_approx(result[5], 2.6, DEFAULT_EPSILON);
        assert_approx(result[6], 3.28, DEFAULT_EPSILON);
    }

    #[test]
    fn smma_constant_series_is_constant() {
        let result = smma_of_series(&[7.5; 30], 13);
        assert!(result[12..].iter().all(|&v| (v - 7.5).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn smma_too_short() {
        assert!(smma_of_series(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
        assert!(smma_of_series(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
