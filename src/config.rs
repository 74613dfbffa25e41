// =============================================================================
// Analysis Configuration — environment-driven with code defaults
// =============================================================================
//
// All knobs come from `CYCLESCOPE_*` environment variables (read after
// `.env` loading), falling back to the defaults below. There is no config
// file: each run is stateless.
//
//   CYCLESCOPE_SYMBOL      trading pair, e.g. BTCUSDT
//   CYCLESCOPE_INTERVALS   comma-separated kline intervals, e.g. 1d,4h,1h,15m
//   CYCLESCOPE_PRIMARY     the interval feeding phase/path analysis
//   CYCLESCOPE_LIMIT       candles fetched per interval
//   CYCLESCOPE_DEMO        "1"/"true" forces demo mode

use tracing::warn;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_PRIMARY_INTERVAL: &str = "1h";
pub const DEFAULT_CANDLE_LIMIT: usize = 200;

fn default_intervals() -> Vec<String> {
    ["1d", "4h", "1h", "15m"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Resolved configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub symbol: String,
    pub intervals: Vec<String>,
    pub primary_interval: String,
    pub candle_limit: usize,
    pub demo: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            intervals: default_intervals(),
            primary_interval: DEFAULT_PRIMARY_INTERVAL.to_string(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
            demo: false,
        }
    }
}

impl AnalysisConfig {
    /// Build the config from the environment, keeping defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(symbol) = std::env::var("CYCLESCOPE_SYMBOL") {
            let symbol = symbol.trim().to_uppercase();
            if !symbol.is_empty() {
                config.symbol = symbol;
            }
        }

        if let Ok(intervals) = std::env::var("CYCLESCOPE_INTERVALS") {
            let parsed: Vec<String> = intervals
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.intervals = parsed;
            }
        }

        if let Ok(primary) = std::env::var("CYCLESCOPE_PRIMARY") {
            let primary = primary.trim().to_string();
            if !primary.is_empty() {
                config.primary_interval = primary;
            }
        }

        if let Ok(limit) = std::env::var("CYCLESCOPE_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.candle_limit = n,
                _ => warn!(value = %limit, "CYCLESCOPE_LIMIT is not a positive integer — keeping default"),
            }
        }

        if let Ok(demo) = std::env::var("CYCLESCOPE_DEMO") {
            config.demo = matches!(demo.trim(), "1" | "true" | "TRUE" | "yes");
        }

        config
    }
}
