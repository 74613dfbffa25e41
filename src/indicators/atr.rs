// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) per bar:
//   TR_0 = H_0 - L_0                       (no previous close exists)
//   TR_i = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the Wilder-smoothed average of TR:
//   seed  = plain mean of the first `period` TR values
//   ATR_t = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Because TR_0 needs no prior candle, ATR is defined for any non-empty
// slice: with fewer than `period` true ranges the seed simply averages the
// history that exists, and a single candle yields `high - low`.

use crate::indicators::series::wilder_series;
use crate::types::Candle;

pub const ATR_PERIOD: usize = 14;

/// True-range series for `candles`, one value per candle.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(candles.len());
    for (i, c) in candles.iter().enumerate() {
        if i == 0 {
            tr.push(c.high - c.low);
        } else {
            let prev_close = candles[i - 1].close;
            let hl = c.high - c.low;
            let hc = (c.high - prev_close).abs();
            let lc = (c.low - prev_close).abs();
            tr.push(hl.max(hc).max(lc));
        }
    }
    tr
}

/// Compute the most recent ATR value using Wilder's smoothing.
///
/// Returns `None` when `period` is zero, `candles` is empty, or the seed
/// average is non-finite.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.is_empty() {
        return None;
    }

    let tr = true_ranges(candles);

    // Fewer true ranges than the period: the seed averages what exists.
    if tr.len() < period {
        let mean = tr.iter().sum::<f64>() / tr.len() as f64;
        return mean.is_finite().then_some(mean);
    }

    wilder_series(&tr, period).last().copied()
}

/// ATR with the standard 14-period default.
pub fn latest_atr(candles: &[Candle]) -> Option<f64> {
    calculate_atr(candles, ATR_PERIOD)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: 0,
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn atr_empty_and_period_zero() {
        assert!(calculate_atr(&[], 14).is_none());
        let candles = vec![candle(100.0, 105.0, 95.0, 102.0); 20];
        assert!(calculate_atr(&candles, 0).is_none());
    }

    #[test]
    fn atr_single_candle_is_high_minus_low() {
        let candles = vec![candle(100.0, 108.0, 97.0, 103.0)];
        let atr = calculate_atr(&candles, 14).unwrap();
        assert!((atr - 11.0).abs() < 1e-10);
    }

    #[test]
    fn atr_is_never_negative() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                candle(base - 0.5, base + 2.0, base - 2.0, base + 0.5)
            })
            .collect();
        for n in 1..=candles.len() {
            let atr = calculate_atr(&candles[..n], 14).unwrap();
            assert!(atr >= 0.0, "ATR must be non-negative, got {atr} at n={n}");
        }
    }

    #[test]
    fn atr_constant_range_converges_to_range() {
        // Every candle spans exactly 10; the smoothed value stays near 10.
        let mut candles = Vec::new();
        for i in 0..40 {
            let base = 100.0 + i as f64 * 0.1;
            candles.push(candle(base, base + 5.0, base - 5.0, base));
        }
        let atr = calculate_atr(&candles, 14).unwrap();
        assert!((atr - 10.0).abs() < 1.0, "expected ATR near 10.0, got {atr}");
    }

    #[test]
    fn atr_true_range_uses_prev_close_on_gaps() {
        // Gap up: |H - prevClose| = 20 dwarfs the bar's own 7-point range.
        let candles = vec![
            candle(100.0, 105.0, 95.0, 95.0),
            candle(110.0, 115.0, 108.0, 112.0),
            candle(112.0, 118.0, 110.0, 115.0),
            candle(115.0, 120.0, 113.0, 118.0),
        ];
        let tr = true_ranges(&candles);
        assert!((tr[1] - 20.0).abs() < 1e-10);
        let atr = calculate_atr(&candles, 3).unwrap();
        assert!(atr > 7.0, "ATR should reflect the gap, got {atr}");
    }

    #[test]
    fn atr_nan_returns_none() {
        let candles = vec![
            candle(100.0, 105.0, 95.0, 100.0),
            candle(100.0, f64::NAN, 95.0, 100.0),
            candle(100.0, 105.0, 95.0, 100.0),
        ];
        assert!(calculate_atr(&candles, 3).is_none());
    }

    #[test]
    fn atr_wilder_recursion_beyond_seed() {
        // period=2, four candles: seed = mean(TR0, TR1), then two recursions.
        let candles = vec![
            candle(100.0, 102.0, 98.0, 101.0),
            candle(101.0, 104.0, 100.0, 103.0),
            candle(103.0, 105.0, 101.0, 104.0),
            candle(104.0, 110.0, 103.0, 108.0),
        ];
        let tr = true_ranges(&candles);
        let mut expected = (tr[0] + tr[1]) / 2.0;
        expected = (expected * 1.0 + tr[2]) / 2.0;
        expected = (expected * 1.0 + tr[3]) / 2.0;
        let atr = calculate_atr(&candles, 2).unwrap();
        assert!((atr - expected).abs() < 1e-10);
    }
}
