// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the population standard deviation of
// the trailing window. The bandwidth percentage normalises the envelope:
//
//   bandwidth% = (upper - lower) / mid * 100      (0 when mid <= 0)
//
// Bandwidth is the volatility metric consumed by the phase classifier and
// the trading-suggestion layer.

use serde::{Deserialize, Serialize};

use crate::indicators::series::{population_std, sma_series};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_MULT: f64 = 2.0;

/// Result of a Bollinger Band calculation at the latest index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerResult {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
    /// Envelope width relative to the middle band, in percent.
    pub bandwidth_pct: f64,
}

/// Calculate Bollinger Bands over the trailing `period` closes.
///
/// Returns `None` when `period` is zero or fewer than `period` closes are
/// available. A non-positive middle band is not an error: the bands are
/// still reported and the bandwidth falls back to 0 (the specified
/// zero-denominator policy).
pub fn calculate_bollinger(
    closes: &[f64],
    period: usize,
    num_std: f64,
) -> Option<BollingerResult> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let mid = *sma_series(closes, period).last()?;
    let window = &closes[closes.len() - period..];
    let std_dev = population_std(window, mid);

    let upper = mid + num_std * std_dev;
    let lower = mid - num_std * std_dev;
    let bandwidth_pct = if mid > 0.0 {
        (upper - lower) / mid * 100.0
    } else {
        0.0
    };

    if !upper.is_finite() || !lower.is_finite() || !bandwidth_pct.is_finite() {
        return None;
    }

    Some(BollingerResult {
        upper,
        mid,
        lower,
        bandwidth_pct,
    })
}

/// Bands with the standard 20-period / 2σ parameters.
pub fn latest_bollinger(closes: &[f64]) -> Option<BollingerResult> {
    calculate_bollinger(closes, BOLLINGER_PERIOD, BOLLINGER_STD_MULT)
}
