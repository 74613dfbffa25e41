// =============================================================================
// Full-Cycle Analysis — per-interval snapshots, resonance, phase and paths
// =============================================================================
//
// Pure orchestration over already-fetched data: one indicator snapshot and
// signal-strength rating per interval, a resonance verdict across the
// timeframes, then phase classification, scenario generation and trading
// suggestions on the primary interval. No I/O happens here — the fetch layer
// (or the demo generator) supplies the candles and market context, so every
// (symbol, interval) analysis can run concurrently with no coordination.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::indicators::{compute_snapshot, IndicatorSnapshot};
use crate::phase::paths::{generate_paths, PathScenario};
use crate::phase::{classify_phase, PhaseResult};
use crate::signal_strength::signal_strength;
use crate::suggestions::{build_suggestions, TradeSuggestions};
use crate::types::{Candle, MarketContext};

/// Minimum number of aligned timeframes for a resonance call.
pub const RESONANCE_MIN_ALIGNED: usize = 3;

/// Snapshot plus conviction rating for one timeframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalAnalysis {
    pub interval: String,
    pub snapshot: IndicatorSnapshot,
    pub strength: u8,
}

/// Cross-timeframe alignment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resonance {
    /// At least [`RESONANCE_MIN_ALIGNED`] timeframes lean bullish.
    Bullish(usize),
    /// At least [`RESONANCE_MIN_ALIGNED`] timeframes lean bearish.
    Bearish(usize),
    None,
}

impl std::fmt::Display for Resonance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish(n) => write!(f, "bullish resonance ({n} timeframes aligned)"),
            Self::Bearish(n) => write!(f, "bearish resonance ({n} timeframes aligned)"),
            Self::None => write!(f, "no clear resonance"),
        }
    }
}

/// Everything one report run needs, computed in a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct CycleAnalysis {
    pub symbol: String,
    pub intervals: Vec<IntervalAnalysis>,
    pub resonance: Resonance,
    /// Index into `intervals` of the primary timeframe.
    pub primary: usize,
    pub phase: PhaseResult,
    pub paths: Vec<PathScenario>,
    pub suggestions: TradeSuggestions,
    pub context: MarketContext,
}

impl CycleAnalysis {
    pub fn primary_interval(&self) -> &IntervalAnalysis {
        &self.intervals[self.primary]
    }
}

/// Run the full analysis over per-interval candle sets.
///
/// Intervals with an empty candle set are skipped with a warning; returns
/// `None` when no interval has data at all. The primary interval falls back
/// to the first analysable one when the requested interval is missing.
pub fn analyze(
    symbol: &str,
    interval_candles: &[(String, Vec<Candle>)],
    context: &MarketContext,
    primary_interval: &str,
) -> Option<CycleAnalysis> {
    let mut intervals = Vec::with_capacity(interval_candles.len());

    for (interval, candles) in interval_candles {
        match compute_snapshot(candles) {
            Some(snapshot) => {
                let strength = signal_strength(&snapshot);
                debug!(
                    symbol,
                    interval = %interval,
                    candles = candles.len(),
                    trend = %snapshot.trend,
                    strength,
                    "interval analysed"
                );
                intervals.push(IntervalAnalysis {
                    interval: interval.clone(),
                    snapshot,
                    strength,
                });
            }
            None => {
                warn!(symbol, interval = %interval, "no candles for interval — skipping");
            }
        }
    }

    if intervals.is_empty() {
        return None;
    }

    let resonance = detect_resonance(&intervals);

    let primary = intervals
        .iter()
        .position(|ia| ia.interval == primary_interval)
        .unwrap_or(0);

    let snapshot = &intervals[primary].snapshot;
    let phase = classify_phase(
        snapshot,
        context.funding_rate,
        context.open_interest_delta,
    );
    let paths = generate_paths(phase.selected, snapshot.close, snapshot);
    let suggestions = build_suggestions(snapshot, &phase, &paths);

    Some(CycleAnalysis {
        symbol: symbol.to_string(),
        intervals,
        resonance,
        primary,
        phase,
        paths,
        suggestions,
        context: context.clone(),
    })
}

/// Count bullish/bearish-leaning timeframes and call the resonance.
fn detect_resonance(intervals: &[IntervalAnalysis]) -> Resonance {
    let bullish = intervals
        .iter()
        .filter(|ia| ia.snapshot.trend.is_bullish())
        .count();
    let bearish = intervals
        .iter()
        .filter(|ia| ia.snapshot.trend.is_bearish())
        .count();

    if bullish >= RESONANCE_MIN_ALIGNED {
        Resonance::Bullish(bullish)
    } else if bearish >= RESONANCE_MIN_ALIGNED {
        Resonance::Bearish(bearish)
    } else {
        Resonance::None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                open_time: i as i64 * 3_600_000,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 100.0,
            })
            .collect()
    }

    fn rising(n: usize) -> Vec<Candle> {
        candles_from_closes(&(0..n).map(|x| 100.0 + x as f64).collect::<Vec<_>>())
    }

    fn falling(n: usize) -> Vec<Candle> {
        candles_from_closes(&(0..n).rev().map(|x| 100.0 + x as f64).collect::<Vec<_>>())
    }

    #[test]
    fn analyze_requires_some_data() {
        let ctx = MarketContext::default();
        assert!(analyze("BTCUSDT", &[], &ctx, "1h").is_none());
        let empty = vec![("1h".to_string(), Vec::new())];
        assert!(analyze("BTCUSDT", &empty, &ctx, "1h").is_none());
    }

    #[test]
    fn primary_falls_back_to_first_interval() {
        let ctx = MarketContext::default();
        let data = vec![
            ("4h".to_string(), rising(240)),
            ("15m".to_string(), rising(240)),
        ];
        let analysis = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        assert_eq!(analysis.primary, 0);
        assert_eq!(analysis.primary_interval().interval, "4h");
    }

    #[test]
    fn bullish_resonance_across_timeframes() {
        let ctx = MarketContext::default();
        let data: Vec<(String, Vec<Candle>)> = ["1d", "4h", "1h", "15m"]
            .iter()
            .map(|iv| (iv.to_string(), rising(240)))
            .collect();
        let analysis = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        assert_eq!(analysis.resonance, Resonance::Bullish(4));
    }

    #[test]
    fn mixed_trends_have_no_resonance() {
        let ctx = MarketContext::default();
        let data = vec![
            ("1d".to_string(), rising(240)),
            ("4h".to_string(), falling(240)),
            ("1h".to_string(), rising(240)),
            ("15m".to_string(), falling(240)),
        ];
        let analysis = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        assert_eq!(analysis.resonance, Resonance::None);
    }

    #[test]
    fn end_to_end_rising_market_with_positive_funding_is_markup_family() {
        // Strictly increasing closes with full EMA history and positive
        // funding: the selected phase depends on the funding sign and lands
        // in the markup/distribution family.
        let ctx = MarketContext {
            funding_rate: 0.001,
            open_interest: 100_000.0,
            open_interest_delta: 500.0,
            long_short_ratio: Some(1.2),
        };
        let data = vec![("1h".to_string(), rising(240))];
        let analysis = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();

        assert!(matches!(
            analysis.phase.selected,
            Phase::Markup | Phase::Distribution
        ));
        assert_eq!(analysis.paths.len(), 3);
        let total: u32 = analysis.paths.iter().map(|p| p.probability_pct as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn overheated_funding_tips_rising_market_to_distribution() {
        let ctx = MarketContext {
            funding_rate: 0.05,
            open_interest: 100_000.0,
            open_interest_delta: 0.0,
            long_short_ratio: None,
        };
        let data = vec![("1h".to_string(), rising(240))];
        let analysis = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        assert_eq!(analysis.phase.selected, Phase::Distribution);
    }

    #[test]
    fn analysis_is_deterministic() {
        let ctx = MarketContext {
            funding_rate: 0.001,
            open_interest: 100_000.0,
            open_interest_delta: 250.0,
            long_short_ratio: Some(1.1),
        };
        let data = vec![("1h".to_string(), rising(240))];
        let a = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        let b = analyze("BTCUSDT", &data, &ctx, "1h").unwrap();
        assert_eq!(a.phase.selected, b.phase.selected);
        assert_eq!(a.phase.confidence, b.phase.confidence);
        assert_eq!(a.resonance, b.resonance);
        assert_eq!(a.paths[0].name, b.paths[0].name);
    }
}
