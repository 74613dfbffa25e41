// =============================================================================
// Series Primitives — rolling and recursive numeric building blocks
// =============================================================================
//
// Every smoothed indicator in this crate reduces to one of three primitives:
//
//   SMA     — plain rolling mean over a trailing window
//   EMA     — exponential recursion seeded with the SMA of the first window
//   RMA     — Wilder's recursion: (prev * (period - 1) + value) / period
//
// All three consume their input in a single forward pass, threading one
// accumulator. None of them is ever recomputed from scratch at a query point.
//
// Output series are tail-aligned: the first output element corresponds to
// input index `period - 1`, and an input shorter than `period` produces an
// empty output.

/// Rolling simple moving average.
///
/// Returns one value per input element starting at index `period - 1`, or an
/// empty `Vec` when `period` is zero or the input is too short.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut result = Vec::with_capacity(values.len() - period + 1);

    // Running-sum update: subtract the element leaving the window, add the
    // one entering it.
    let mut sum: f64 = values[..period].iter().sum();
    result.push(sum / period_f);

    for i in period..values.len() {
        sum += values[i] - values[i - period];
        result.push(sum / period_f);
    }

    result
}

/// Exponentially smoothed series with `k = 2 / (period + 1)`.
///
/// The seed is the SMA of the first `period` values; each subsequent value is
/// `v * k + prev * (1 - k)`. Returns an empty `Vec` when `period` is zero or
/// the input is too short. Non-finite intermediate values truncate the series
/// — downstream consumers should not trust a broken tail.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &v in &values[period..] {
        let ema = v * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// Wilder-smoothed (RMA) series.
///
/// The seed is the plain mean of the first `period` values; thereafter
/// `rma = (prev * (period - 1) + v) / period`. Same emptiness and non-finite
/// truncation rules as [`ema_series`].
pub fn wilder_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period_f;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &v in &values[period..] {
        let rma = (prev * (period_f - 1.0) + v) / period_f;
        if !rma.is_finite() {
            break;
        }
        result.push(rma);
        prev = rma;
    }

    result
}

/// Population standard deviation of `window` around the supplied `mean`.
pub fn population_std(window: &[f64], mean: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let variance =
        window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_and_short_inputs() {
        assert!(sma_series(&[], 3).is_empty());
        assert!(sma_series(&[1.0, 2.0], 3).is_empty());
        assert!(sma_series(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn sma_known_values() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = sma_series(&values, 3);
        assert_eq!(sma.len(), 3);
        assert!((sma[0] - 2.0).abs() < 1e-10);
        assert!((sma[1] - 3.0).abs() < 1e-10);
        assert!((sma[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_seed_is_sma_of_first_window() {
        let values = [2.0, 4.0, 6.0];
        let ema = ema_series(&values, 3);
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_recursion_matches_hand_rolled() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = ema_series(&values, 5);
        assert_eq!(ema.len(), 6);

        let k = 2.0 / 6.0;
        let mut expected = 3.0;
        for (i, &v) in values[5..].iter().enumerate() {
            expected = v * k + expected * (1.0 - k);
            assert!((ema[i + 1] - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn ema_truncates_on_nan() {
        let values = [1.0, 2.0, 3.0, f64::NAN, 5.0];
        let ema = ema_series(&values, 3);
        // Seed is finite; the NaN input poisons the next step and stops the
        // series there.
        assert_eq!(ema.len(), 1);
    }

    #[test]
    fn wilder_seed_and_recursion() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let rma = wilder_series(&values, 3);
        assert_eq!(rma.len(), 2);
        assert!((rma[0] - 2.0).abs() < 1e-10);
        // (2.0 * 2 + 4.0) / 3 = 8/3
        assert!((rma[1] - 8.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn wilder_constant_input_stays_constant() {
        let values = [5.0; 20];
        let rma = wilder_series(&values, 14);
        for &v in &rma {
            assert!((v - 5.0).abs() < 1e-10);
        }
    }

    #[test]
    fn population_std_flat_window_is_zero() {
        let window = [7.0; 10];
        assert!((population_std(&window, 7.0) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn population_std_known_value() {
        let window = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Classic example: population std = 2.0
        assert!((population_std(&window, 5.0) - 2.0).abs() < 1e-10);
    }
}
