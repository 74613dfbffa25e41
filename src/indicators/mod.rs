// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the core technical indicators.
// Every public function returns `Option<T>` (or an empty series) when history
// is insufficient, so callers are forced to propagate absence instead of
// inventing a zero.
//
// `compute_snapshot` assembles the per-interval [`IndicatorSnapshot`] that
// the phase classifier, path generator and report layer consume.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod series;
pub mod trend;

use serde::{Deserialize, Serialize};

use crate::types::Candle;

pub use bollinger::BollingerResult;
pub use macd::{CrossState, MacdResult};
pub use rsi::RsiStatus;
pub use trend::Trend;

/// EMA periods feeding the trend classifier.
pub const EMA_SHORT_PERIOD: usize = 20;
pub const EMA_MID_PERIOD: usize = 50;
pub const EMA_LONG_PERIOD: usize = 200;

pub const RSI_PERIOD: usize = 14;

/// Latest value of every computed indicator for one (symbol, interval) pass.
///
/// Built once per analysis and never mutated afterwards; a new pass produces
/// a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Closing price of the most recent candle.
    pub close: f64,

    /// Volume of the most recent candle.
    pub volume: f64,

    /// Close-over-close change versus 24 bars earlier, in percent.
    pub change_24_pct: Option<f64>,

    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,

    /// RSI(14) in [0, 100].
    pub rsi: Option<f64>,
    pub rsi_status: RsiStatus,

    pub macd: Option<MacdResult>,

    /// ATR(14), always >= 0 when present.
    pub atr: Option<f64>,

    pub bollinger: Option<BollingerResult>,

    pub trend: Trend,
}

impl IndicatorSnapshot {
    /// The latest MACD cross state, `None` variant when MACD is absent.
    pub fn cross_state(&self) -> CrossState {
        self.macd.as_ref().map_or(CrossState::None, |m| m.cross)
    }

    /// Bollinger bandwidth percentage, absent with the bands.
    pub fn bandwidth_pct(&self) -> Option<f64> {
        self.bollinger.as_ref().map(|b| b.bandwidth_pct)
    }
}

/// Compute a full indicator snapshot from an oldest-first candle slice.
///
/// Returns `None` only for an empty slice. Individual indicators degrade to
/// absent values on their own insufficient-history rules; the snapshot
/// itself always exists once there is at least one candle.
pub fn compute_snapshot(candles: &[Candle]) -> Option<IndicatorSnapshot> {
    let last = candles.last()?;
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let close = last.close;

    let ema20 = ema::latest_ema(&closes, EMA_SHORT_PERIOD);
    let ema50 = ema::latest_ema(&closes, EMA_MID_PERIOD);
    let ema200 = ema::latest_ema(&closes, EMA_LONG_PERIOD);

    let rsi = rsi::latest_rsi(&closes, RSI_PERIOD);
    let macd = macd::latest_macd(&closes);
    let atr = atr::latest_atr(candles);
    let bollinger = bollinger::latest_bollinger(&closes);

    let change_24_pct = if closes.len() >= 24 {
        let base = closes[closes.len() - 24];
        (base != 0.0).then(|| (close - base) / base * 100.0)
    } else {
        None
    };

    Some(IndicatorSnapshot {
        close,
        volume: last.volume,
        change_24_pct,
        ema20,
        ema50,
        ema200,
        rsi,
        rsi_status: RsiStatus::from_value(rsi),
        macd,
        atr,
        bollinger,
        trend: trend::determine_trend(close, ema20, ema50, ema200),
    })
}
