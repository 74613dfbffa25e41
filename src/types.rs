// =============================================================================
// Shared types used across the cyclescope analyzer
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single OHLCV candle. Every series this tool handles is ordered
/// oldest-first with no duplicate open times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since the UNIX epoch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Derivatives-market context for one symbol, collected once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketContext {
    /// Latest funding rate as a signed fraction (0.0001 = 0.01%).
    pub funding_rate: f64,

    /// Current open interest in contracts.
    pub open_interest: f64,

    /// Signed open-interest change. Only the sign is consumed by the phase
    /// classifier; 0.0 when only a single OI sample is available.
    pub open_interest_delta: f64,

    /// Top-trader long/short account ratio. Display-only.
    pub long_short_ratio: Option<f64>,
}
