// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
// DIF       = EMA(fast) - EMA(slow), aligned on the slow series
// DEA       = EMA(DIF, signal)
// Histogram = (DIF - DEA) * 2
//
// Both EMAs are SMA-seeded, so the fast series is longer than the slow one.
// Alignment drops the oldest fast entries: both series then end on the same
// most-recent index. The DEA series is in turn shorter than the DIF line and
// trails it the same way.
//
// Cross state compares the last two aligned (DIF, DEA) pairs:
//   prev DIF <= prev DEA and DIF > DEA  =>  JustGolden
//   prev DIF >= prev DEA and DIF < DEA  =>  JustDeath
//   otherwise the current ordering decides Golden / Death; with fewer than
//   two pairs there is nothing to compare and the state is None.

use serde::{Deserialize, Serialize};

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// Relationship between the DIF and DEA lines at the latest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossState {
    /// DIF above DEA (bullish configuration).
    Golden,
    /// DIF below (or on) DEA (bearish configuration).
    Death,
    /// DIF crossed above DEA on the latest bar.
    JustGolden,
    /// DIF crossed below DEA on the latest bar.
    JustDeath,
    /// Not enough aligned pairs to compare.
    None,
}

impl CrossState {
    /// True for `Golden` and `JustGolden`.
    pub fn is_golden(self) -> bool {
        matches!(self, Self::Golden | Self::JustGolden)
    }

    /// True for `Death` and `JustDeath`.
    pub fn is_death(self) -> bool {
        matches!(self, Self::Death | Self::JustDeath)
    }

    /// True when the cross happened on the latest bar.
    pub fn is_fresh(self) -> bool {
        matches!(self, Self::JustGolden | Self::JustDeath)
    }
}

impl std::fmt::Display for CrossState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Golden => write!(f, "golden"),
            Self::Death => write!(f, "death"),
            Self::JustGolden => write!(f, "just golden"),
            Self::JustDeath => write!(f, "just death"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Latest MACD reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdResult {
    pub dif: f64,
    pub dea: f64,
    pub hist: f64,
    pub cross: CrossState,
}

/// Compute the latest MACD values for `closes`.
///
/// Returns `None` when either EMA — or the DEA smoothing of the DIF line —
/// cannot be seeded; absence propagates, it is never replaced by zero.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<MacdResult> {
    let ema_fast = super::series::ema_series(closes, fast);
    let ema_slow = super::series::ema_series(closes, slow);
    if ema_fast.is_empty() || ema_slow.is_empty() || ema_fast.len() < ema_slow.len() {
        return None;
    }

    // Truncate the fast series from the front so both end on the same index.
    let offset = ema_fast.len() - ema_slow.len();
    let dif_line: Vec<f64> = ema_fast[offset..]
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let dea_series = super::series::ema_series(&dif_line, signal);
    let dea = *dea_series.last()?;
    let dif = *dif_line.last()?;
    let hist = (dif - dea) * 2.0;

    // The DEA series trails the DIF line; its second-to-last element pairs
    // with the second-to-last DIF entry.
    let prev = if dea_series.len() >= 2 {
        Some((
            dif_line[dif_line.len() - 2],
            dea_series[dea_series.len() - 2],
        ))
    } else {
        None
    };
    let cross = detect_cross(prev, (dif, dea));

    Some(MacdResult {
        dif,
        dea,
        hist,
        cross,
    })
}

/// Latest MACD with the standard 12/26/9 parameters.
pub fn latest_macd(closes: &[f64]) -> Option<MacdResult> {
    calculate_macd(closes, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD)
}

/// Classify the cross state from the previous and current (DIF, DEA) pairs.
pub fn detect_cross(prev: Option<(f64, f64)>, curr: (f64, f64)) -> CrossState {
    let (dif, dea) = curr;
    match prev {
        Some((prev_dif, prev_dea)) => {
            if prev_dif <= prev_dea && dif > dea {
                CrossState::JustGolden
            } else if prev_dif >= prev_dea && dif < dea {
                CrossState::JustDeath
            } else if dif > dea {
                CrossState::Golden
            } else {
                CrossState::Death
            }
        }
        None => CrossState::None,
    }
}
