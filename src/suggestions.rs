// =============================================================================
// Trading Suggestions — position guidance derived from the primary scenario
// =============================================================================
//
// Translates the classified phase, the primary scenario and the volatility
// environment into concrete guidance:
//
//   Bandwidth > 8  =>  High volatility   — position <= 30%, leverage <= 3x
//   Bandwidth < 4  =>  Low volatility    — position 50-70%,  leverage <= 10x
//   otherwise      =>  Normal volatility — position 40-50%,  leverage <= 5x
//
// A long setup is emitted when the primary path is bullish, or neutral in an
// accumulation/markup phase; a short setup mirrors it for bearish paths and
// distribution/markdown phases. Entry/stop/target distances are fixed ATR
// multiples, which pins the canonical reward:risk at 2:1.

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;
use crate::phase::paths::{Direction, PathScenario, ATR_FALLBACK_PCT};
use crate::phase::{Phase, PhaseResult};

pub const ENTRY_ATR_MULT: f64 = 0.5;
pub const STOP_ATR_MULT: f64 = 1.5;
pub const TARGET1_ATR_MULT: f64 = 1.5;
pub const TARGET2_ATR_MULT: f64 = 3.0;
pub const STOP_ALERT_ATR_MULT: f64 = 1.5;

pub const HIGH_VOL_BANDWIDTH: f64 = 8.0;
pub const LOW_VOL_BANDWIDTH: f64 = 4.0;

/// Volatility regime bucketed from the Bollinger bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityEnv {
    High,
    Normal,
    Low,
}

impl VolatilityEnv {
    /// Bucket an optional bandwidth; absence reads as Normal.
    pub fn from_bandwidth(bandwidth_pct: Option<f64>) -> Self {
        match bandwidth_pct {
            Some(bw) if bw > HIGH_VOL_BANDWIDTH => Self::High,
            Some(bw) if bw < LOW_VOL_BANDWIDTH => Self::Low,
            _ => Self::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high volatility",
            Self::Normal => "normal volatility",
            Self::Low => "low volatility",
        }
    }

    /// Suggested position size range.
    pub fn position_pct(self) -> &'static str {
        match self {
            Self::High => "<= 30%",
            Self::Normal => "40-50%",
            Self::Low => "50-70%",
        }
    }

    /// Suggested leverage ceiling.
    pub fn leverage(self) -> &'static str {
        match self {
            Self::High => "<= 3x",
            Self::Normal => "<= 5x",
            Self::Low => "<= 10x",
        }
    }
}

/// One directional setup: entry, stop, two targets and the resulting R:R.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop: f64,
    pub target1: f64,
    pub target2: f64,
    pub reward_risk: f64,
}

/// Price levels worth monitoring regardless of the chosen setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyLevels {
    /// Break above confirms the bulls (Bollinger upper, ATR fallback).
    pub bull_confirmation: f64,
    /// Break below confirms the bears (Bollinger lower, ATR fallback).
    pub bear_confirmation: f64,
    pub stop_alert_low: f64,
    pub stop_alert_high: f64,
}

/// Condensed run summary for the report footer.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub range_low: f64,
    pub range_high: f64,
    pub phase: Phase,
    pub confidence: u32,
    /// Rationale of the primary scenario.
    pub thesis: String,
    /// The cohort most exposed in this phase family.
    pub trapped_cohort: &'static str,
    pub one_liner: String,
}

/// Full suggestion block for the primary interval.
#[derive(Debug, Clone, Serialize)]
pub struct TradeSuggestions {
    pub vol_env: VolatilityEnv,
    pub long: Option<TradeSetup>,
    pub short: Option<TradeSetup>,
    pub levels: KeyLevels,
    pub summary: ExecutiveSummary,
}

/// Build the suggestion block from the primary snapshot, phase and paths.
///
/// `paths` must be the scenario list generated for `phase.selected`; its
/// first entry is the base case.
pub fn build_suggestions(
    snapshot: &IndicatorSnapshot,
    phase: &PhaseResult,
    paths: &[PathScenario],
) -> TradeSuggestions {
    let price = snapshot.close;
    let atr = snapshot.atr.unwrap_or(price * ATR_FALLBACK_PCT);
    let vol_env = VolatilityEnv::from_bandwidth(snapshot.bandwidth_pct());

    let primary_direction = paths.first().map(|p| p.direction);

    let long_bias = matches!(primary_direction, Some(Direction::Bullish))
        || (matches!(primary_direction, Some(Direction::Neutral))
            && matches!(phase.selected, Phase::Accumulation | Phase::Markup));
    let short_bias = matches!(primary_direction, Some(Direction::Bearish))
        || (matches!(primary_direction, Some(Direction::Neutral))
            && matches!(phase.selected, Phase::Distribution | Phase::Markdown));

    let long = long_bias.then(|| {
        let entry = price - ENTRY_ATR_MULT * atr;
        let stop = price - STOP_ATR_MULT * atr;
        let target1 = price + TARGET1_ATR_MULT * atr;
        TradeSetup {
            entry,
            stop,
            target1,
            target2: price + TARGET2_ATR_MULT * atr,
            reward_risk: (target1 - entry) / (entry - stop),
        }
    });

    let short = short_bias.then(|| {
        let entry = price + ENTRY_ATR_MULT * atr;
        let stop = price + STOP_ATR_MULT * atr;
        let target1 = price - TARGET1_ATR_MULT * atr;
        TradeSetup {
            entry,
            stop,
            target1,
            target2: price - TARGET2_ATR_MULT * atr,
            reward_risk: (entry - target1) / (stop - entry),
        }
    });

    let levels = KeyLevels {
        bull_confirmation: snapshot
            .bollinger
            .as_ref()
            .map_or(price + atr, |b| b.upper),
        bear_confirmation: snapshot
            .bollinger
            .as_ref()
            .map_or(price - atr, |b| b.lower),
        stop_alert_low: price - STOP_ALERT_ATR_MULT * atr,
        stop_alert_high: price + STOP_ALERT_ATR_MULT * atr,
    };

    let trapped_cohort = match phase.selected {
        Phase::Accumulation | Phase::Markup => "short holders and high-leverage shorts",
        Phase::Distribution | Phase::Markdown => "late longs and bottom fishers",
        Phase::Rebalancing => "breakout chasers and two-way leverage",
    };

    let one_liner = match primary_direction {
        Some(Direction::Bullish) => format!(
            "Short-term bias up; watch for a confirmed break above {:.0}",
            price + atr
        ),
        Some(Direction::Bearish) => format!(
            "Short-term bias down; watch the support test at {:.0}",
            price - atr
        ),
        _ => format!(
            "Direction unresolved; wait for the {:.0}-{:.0} range to break",
            price - atr,
            price + atr
        ),
    };

    let summary = ExecutiveSummary {
        range_low: price - atr,
        range_high: price + atr,
        phase: phase.selected,
        confidence: phase.confidence,
        thesis: paths
            .first()
            .map(|p| p.rationale.to_string())
            .unwrap_or_default(),
        trapped_cohort,
        one_liner,
    };

    TradeSuggestions {
        vol_env,
        long,
        short,
        levels,
        summary,
    }
}
