// =============================================================================
// Scenario Path Generator — three ATR-scaled forward paths per phase
// =============================================================================
//
// A static template table maps each phase to exactly three ordered scenarios
// with fixed probability weights summing to 100. Index 0 is the primary path
// — the base case for the trading-suggestion layer. Every phase offers one
// bullish, one bearish and one neutral path.
//
// All price levels are `price ± {0.5, 1, 1.5, 2, 3} × ATR`. When ATR is
// unavailable it defaults to 2% of the current price. The markup and
// markdown pullback scenarios anchor their confirmation/invalidation on the
// EMA20/EMA50 shelf when those EMAs exist, with ATR-scaled fallbacks.

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;
use crate::phase::Phase;

// Scenario structs serialize for reporting only; their text is static
// template data, so there is nothing to deserialize.

/// ATR substitute as a fraction of price when the indicator is absent.
pub const ATR_FALLBACK_PCT: f64 = 0.02;

/// Per-phase probability weights, primary path first.
pub const ACCUMULATION_WEIGHTS: [u8; 3] = [45, 35, 20];
pub const MARKUP_WEIGHTS: [u8; 3] = [50, 35, 15];
pub const DISTRIBUTION_WEIGHTS: [u8; 3] = [45, 35, 20];
pub const MARKDOWN_WEIGHTS: [u8; 3] = [50, 30, 20];
pub const REBALANCING_WEIGHTS: [u8; 3] = [40, 35, 25];

/// Directional bias of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// One price level along a scenario path, with its narrative label.
#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    pub level: f64,
    pub label: &'static str,
}

/// A single forward price scenario.
#[derive(Debug, Clone, Serialize)]
pub struct PathScenario {
    pub name: &'static str,
    /// The three scenarios of one phase sum to exactly 100.
    pub probability_pct: u8,
    pub direction: Direction,
    /// Ordered price levels, starting from the current price.
    pub waypoints: Vec<Waypoint>,
    pub rationale: &'static str,
    /// The crowd this path squeezes.
    pub trap_targets: &'static str,
    pub confirmation_level: f64,
    pub invalidation_level: f64,
}

/// Generate the three scenarios for `phase` around the current `price`.
///
/// The snapshot supplies the ATR (with the 2% fallback) and the optional
/// EMA anchors for pullback scenarios.
pub fn generate_paths(
    phase: Phase,
    price: f64,
    snapshot: &IndicatorSnapshot,
) -> Vec<PathScenario> {
    let atr = snapshot.atr.unwrap_or(price * ATR_FALLBACK_PCT);
    let ema20 = snapshot.ema20;
    let ema50 = snapshot.ema50;

    match phase {
        Phase::Accumulation => vec![
            PathScenario {
                name: "Shakeout then breakout",
                probability_pct: ACCUMULATION_WEIGHTS[0],
                direction: Direction::Bullish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - atr, label: "shakeout low" },
                    Waypoint { level: price + 3.0 * atr, label: "breakout target" },
                ],
                rationale: "Accumulation is complete; a fake breakdown flushes \
                            weak hands before the markup begins",
                trap_targets: "stopped-out dip buyers and over-leveraged longs",
                confirmation_level: price + atr,
                invalidation_level: price - 2.0 * atr,
            },
            PathScenario {
                name: "Extended range accumulation",
                probability_pct: ACCUMULATION_WEIGHTS[1],
                direction: Direction::Neutral,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 0.5 * atr, label: "range low" },
                    Waypoint { level: price + 0.5 * atr, label: "range high" },
                ],
                rationale: "Accumulation is unfinished; price keeps oscillating \
                            inside the range on shrinking volume while open \
                            interest creeps up",
                trap_targets: "breakout chasers on both sides",
                confirmation_level: price + 0.5 * atr,
                invalidation_level: price - atr,
            },
            PathScenario {
                name: "Failed accumulation breakdown",
                probability_pct: ACCUMULATION_WEIGHTS[2],
                direction: Direction::Bearish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 3.0 * atr, label: "breakdown target" },
                ],
                rationale: "Macro pressure or heavy supply overwhelms the range \
                            and the accumulation attempt fails",
                trap_targets: "early bottom fishers",
                confirmation_level: price - 1.5 * atr,
                invalidation_level: price,
            },
        ],
        Phase::Markup => vec![
            PathScenario {
                name: "Trend continuation",
                probability_pct: MARKUP_WEIGHTS[0],
                direction: Direction::Bullish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + 2.0 * atr, label: "next leg target" },
                ],
                rationale: "Momentum is intact; pullbacks stay shallow above the \
                            EMA20 shelf and volume expands on advances",
                trap_targets: "short sellers and sidelined buyers",
                confirmation_level: price + 0.5 * atr,
                invalidation_level: ema20.unwrap_or(price - atr),
            },
            PathScenario {
                name: "Pullback then higher",
                probability_pct: MARKUP_WEIGHTS[1],
                direction: Direction::Neutral,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 1.5 * atr, label: "pullback low" },
                    Waypoint { level: price + atr, label: "recovery target" },
                ],
                rationale: "Profit taking forces a dip into the EMA50 shelf \
                            before the trend resumes",
                trap_targets: "late chasers and over-leveraged longs",
                confirmation_level: ema50.unwrap_or(price - 1.5 * atr),
                invalidation_level: ema50.unwrap_or(price - 2.0 * atr),
            },
            PathScenario {
                name: "Trend reversal",
                probability_pct: MARKUP_WEIGHTS[2],
                direction: Direction::Bearish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 3.0 * atr, label: "reversal target" },
                ],
                rationale: "Distribution has already happened into the strength \
                            and the trend rolls over",
                trap_targets: "trend-following longs",
                confirmation_level: price - 1.5 * atr,
                invalidation_level: price,
            },
        ],
        Phase::Distribution => vec![
            PathScenario {
                name: "Bull trap then dump",
                probability_pct: DISTRIBUTION_WEIGHTS[0],
                direction: Direction::Bearish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + atr, label: "false breakout" },
                    Waypoint { level: price - 3.0 * atr, label: "markdown target" },
                ],
                rationale: "A final push above the range draws in late buyers \
                            before distribution completes and supply takes over",
                trap_targets: "breakout chasers and FOMO longs",
                confirmation_level: price - atr,
                invalidation_level: price + 1.5 * atr,
            },
            PathScenario {
                name: "High-level churn",
                probability_pct: DISTRIBUTION_WEIGHTS[1],
                direction: Direction::Neutral,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 0.5 * atr, label: "range low" },
                    Waypoint { level: price + 0.5 * atr, label: "range high" },
                ],
                rationale: "Distribution is unfinished; price churns near the \
                            high on fading volume while inventory changes hands",
                trap_targets: "two-way breakout traders",
                confirmation_level: price + 0.5 * atr,
                invalidation_level: price - atr,
            },
            PathScenario {
                name: "Squeeze continuation",
                probability_pct: DISTRIBUTION_WEIGHTS[2],
                direction: Direction::Bullish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + 3.0 * atr, label: "extension target" },
                ],
                rationale: "Fresh inflows overwhelm the sellers and the expected \
                            distribution fails upward",
                trap_targets: "early shorts",
                confirmation_level: price + 1.5 * atr,
                invalidation_level: price - atr,
            },
        ],
        Phase::Markdown => vec![
            PathScenario {
                name: "Downtrend continuation",
                probability_pct: MARKDOWN_WEIGHTS[0],
                direction: Direction::Bearish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 2.0 * atr, label: "next leg target" },
                ],
                rationale: "Sellers remain in control; bounces fade below the \
                            EMA20 shelf on shrinking volume",
                trap_targets: "knife catchers and early longs",
                confirmation_level: price - 0.5 * atr,
                invalidation_level: ema20.unwrap_or(price + atr),
            },
            PathScenario {
                name: "Relief bounce",
                probability_pct: MARKDOWN_WEIGHTS[1],
                direction: Direction::Neutral,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + 1.5 * atr, label: "bounce high" },
                    Waypoint { level: price - atr, label: "resumption target" },
                ],
                rationale: "An oversold bounce relieves the pressure without \
                            changing the larger downtrend",
                trap_targets: "bottom buyers and bounce chasers",
                confirmation_level: ema20.unwrap_or(price + atr),
                invalidation_level: ema50.unwrap_or(price + 2.0 * atr),
            },
            PathScenario {
                name: "Capitulation reversal",
                probability_pct: MARKDOWN_WEIGHTS[2],
                direction: Direction::Bullish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + 3.0 * atr, label: "reversal target" },
                ],
                rationale: "Panic selling exhausts the sellers and buyers \
                            reverse the move hard off the lows",
                trap_targets: "late shorts and panic sellers",
                confirmation_level: price + atr,
                invalidation_level: price - 1.5 * atr,
            },
        ],
        Phase::Rebalancing => vec![
            PathScenario {
                name: "Upside resolution",
                probability_pct: REBALANCING_WEIGHTS[0],
                direction: Direction::Bullish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price + 2.0 * atr, label: "breakout target" },
                ],
                rationale: "The compression resolves higher once the range \
                            stops absorbing bids",
                trap_targets: "shorts and fence sitters",
                confirmation_level: price + atr,
                invalidation_level: price - 0.5 * atr,
            },
            PathScenario {
                name: "Downside resolution",
                probability_pct: REBALANCING_WEIGHTS[1],
                direction: Direction::Bearish,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 2.0 * atr, label: "breakdown target" },
                ],
                rationale: "The compression resolves lower once bids thin out \
                            under the range",
                trap_targets: "longs and dip buyers",
                confirmation_level: price - atr,
                invalidation_level: price + 0.5 * atr,
            },
            PathScenario {
                name: "Continued balance",
                probability_pct: REBALANCING_WEIGHTS[2],
                direction: Direction::Neutral,
                waypoints: vec![
                    Waypoint { level: price, label: "current price" },
                    Waypoint { level: price - 0.5 * atr, label: "range low" },
                    Waypoint { level: price + 0.5 * atr, label: "range high" },
                ],
                rationale: "Neither side has an edge; the auction keeps \
                            rotating inside the range on shrinking volume",
                trap_targets: "breakout traders on both sides",
                confirmation_level: price + 0.5 * atr,
                invalidation_level: price - atr,
            },
        ],
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{RsiStatus, Trend};

    fn bare_snapshot(atr: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            volume: 1_000.0,
            change_24_pct: None,
            ema20: None,
            ema50: None,
            ema200: None,
            rsi: None,
            rsi_status: RsiStatus::Neutral,
            macd: None,
            atr,
            bollinger: None,
            trend: Trend::Ranging,
        }
    }

    #[test]
    fn probabilities_sum_to_100_for_every_phase() {
        let snap = bare_snapshot(Some(2.0));
        for phase in Phase::ALL {
            let paths = generate_paths(phase, 100.0, &snap);
            assert_eq!(paths.len(), 3, "{phase} must have three scenarios");
            let total: u32 = paths.iter().map(|p| p.probability_pct as u32).sum();
            assert_eq!(total, 100, "{phase} probabilities must sum to 100");
        }
    }

    #[test]
    fn each_phase_has_one_of_each_direction() {
        let snap = bare_snapshot(Some(2.0));
        for phase in Phase::ALL {
            let paths = generate_paths(phase, 100.0, &snap);
            let bullish = paths.iter().filter(|p| p.direction == Direction::Bullish);
            let bearish = paths.iter().filter(|p| p.direction == Direction::Bearish);
            let neutral = paths.iter().filter(|p| p.direction == Direction::Neutral);
            assert_eq!(bullish.count(), 1, "{phase}");
            assert_eq!(bearish.count(), 1, "{phase}");
            assert_eq!(neutral.count(), 1, "{phase}");
        }
    }

    #[test]
    fn primary_path_is_first() {
        let snap = bare_snapshot(Some(2.0));
        for phase in Phase::ALL {
            let paths = generate_paths(phase, 100.0, &snap);
            let max = paths.iter().map(|p| p.probability_pct).max().unwrap();
            assert_eq!(paths[0].probability_pct, max, "{phase}");
        }
    }

    #[test]
    fn atr_fallback_is_two_percent_of_price() {
        let snap = bare_snapshot(None);
        let paths = generate_paths(Phase::Accumulation, 100.0, &snap);
        // Shakeout low sits one ATR below price; fallback ATR = 2.0.
        assert!((paths[0].waypoints[1].level - 98.0).abs() < 1e-10);
    }

    #[test]
    fn markup_invalidation_anchors_on_ema20() {
        let mut snap = bare_snapshot(Some(2.0));
        snap.ema20 = Some(97.5);
        let paths = generate_paths(Phase::Markup, 100.0, &snap);
        assert!((paths[0].invalidation_level - 97.5).abs() < 1e-10);

        // Without the EMA the original ATR fallback applies.
        snap.ema20 = None;
        let paths = generate_paths(Phase::Markup, 100.0, &snap);
        assert!((paths[0].invalidation_level - 98.0).abs() < 1e-10);
    }

    #[test]
    fn waypoints_start_at_current_price() {
        let snap = bare_snapshot(Some(2.0));
        for phase in Phase::ALL {
            for path in generate_paths(phase, 123.0, &snap) {
                assert!((path.waypoints[0].level - 123.0).abs() < 1e-10);
                assert!(path.waypoints.len() >= 2);
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let snap = bare_snapshot(Some(3.0));
        let a = generate_paths(Phase::Markdown, 250.0, &snap);
        let b = generate_paths(Phase::Markdown, 250.0, &snap);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.name, y.name);
            assert!((x.confirmation_level - y.confirmation_level).abs() < 1e-12);
            assert!((x.invalidation_level - y.invalidation_level).abs() < 1e-12);
        }
    }
}
