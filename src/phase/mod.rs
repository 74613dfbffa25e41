// =============================================================================
// Market Phase Classifier — five-regime additive rule scoring
// =============================================================================
//
// Scores the five market-maker phases from one indicator snapshot plus the
// funding-rate and open-interest-delta signals. Each phase owns two
// independent boolean rules; points are additive and never normalised.
//
//   Phase          Rule A (+40)                                Rule B (+30)
//   accumulation   bearish/ranging trend, funding < 0, OIΔ > 0  RSI < 40 and bandwidth < 4
//   markup         bullish trend, funding > 0, OIΔ > 0          RSI > 60 and golden cross
//   distribution   strong bullish trend, funding > 0.03         RSI > 70 and bandwidth > 8
//   markdown       bearish trend, OIΔ < 0                       RSI < 40 and death cross
//   rebalancing    ranging trend, |funding| < 0.01              bandwidth < 3 (+20, not +30)
//
// Selection takes the maximum score; ties resolve in the declaration order
// above, first-in-order winning. A missing indicator value simply fails the
// rules that reference it — absence contributes no points and never panics.

pub mod paths;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{IndicatorSnapshot, Trend};

/// Points awarded by each phase's primary (trend + derivatives) rule.
pub const PRIMARY_RULE_POINTS: u32 = 40;
/// Points awarded by each phase's secondary (oscillator/volatility) rule.
pub const SECONDARY_RULE_POINTS: u32 = 30;
/// The rebalancing squeeze rule is weaker than the other secondary rules.
pub const SQUEEZE_RULE_POINTS: u32 = 20;

/// Funding-rate threshold marking overheated longs (distribution rule A).
pub const DISTRIBUTION_FUNDING_THRESHOLD: f64 = 0.03;
/// Funding band treated as "flat" for the rebalancing rule.
pub const REBALANCING_FUNDING_BAND: f64 = 0.01;

pub const RSI_LOW_THRESHOLD: f64 = 40.0;
pub const RSI_HIGH_THRESHOLD: f64 = 60.0;
pub const RSI_OVERHEATED_THRESHOLD: f64 = 70.0;

pub const BANDWIDTH_TIGHT: f64 = 4.0;
pub const BANDWIDTH_WIDE: f64 = 8.0;
pub const BANDWIDTH_SQUEEZE: f64 = 3.0;

/// The five mutually exclusive market-maker phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Accumulation,
    Markup,
    Distribution,
    Markdown,
    Rebalancing,
}

impl Phase {
    /// Declaration order — doubles as the tie-break order (first wins).
    pub const ALL: [Phase; 5] = [
        Phase::Accumulation,
        Phase::Markup,
        Phase::Distribution,
        Phase::Markdown,
        Phase::Rebalancing,
    ];

    fn index(self) -> usize {
        match self {
            Self::Accumulation => 0,
            Self::Markup => 1,
            Self::Distribution => 2,
            Self::Markdown => 3,
            Self::Rebalancing => 4,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accumulation => write!(f, "Accumulation"),
            Self::Markup => write!(f, "Markup"),
            Self::Distribution => write!(f, "Distribution"),
            Self::Markdown => write!(f, "Markdown"),
            Self::Rebalancing => write!(f, "Rebalancing"),
        }
    }
}

/// Rule-awarded points per phase. Scores are raw points, not percentages —
/// they need not sum to anything in particular.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseScores {
    scores: [u32; 5],
}

impl PhaseScores {
    pub fn score(&self, phase: Phase) -> u32 {
        self.scores[phase.index()]
    }

    fn add(&mut self, phase: Phase, points: u32) {
        self.scores[phase.index()] += points;
    }

    /// Iterate phases with their scores in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, u32)> + '_ {
        Phase::ALL.iter().map(move |&p| (p, self.score(p)))
    }
}

/// Outcome of one classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResult {
    pub scores: PhaseScores,
    pub selected: Phase,
    /// The winning score (0–70 with the base rule set).
    pub confidence: u32,
}

/// Classify the market phase from a snapshot and the derivative signals.
///
/// Deterministic pure function: identical inputs always produce the same
/// result, including the tie-break.
pub fn classify_phase(
    snapshot: &IndicatorSnapshot,
    funding_rate: f64,
    oi_delta: f64,
) -> PhaseResult {
    let trend = snapshot.trend;
    let rsi = snapshot.rsi;
    let bandwidth = snapshot.bandwidth_pct();
    let cross = snapshot.cross_state();

    // Fixed, declaration-ordered rule list. Missing values fail their
    // predicate and award nothing.
    let rules: [(Phase, u32, bool); 10] = [
        (
            Phase::Accumulation,
            PRIMARY_RULE_POINTS,
            (trend == Trend::Bearish || trend == Trend::Ranging)
                && funding_rate < 0.0
                && oi_delta > 0.0,
        ),
        (
            Phase::Accumulation,
            SECONDARY_RULE_POINTS,
            rsi.is_some_and(|r| r < RSI_LOW_THRESHOLD)
                && bandwidth.is_some_and(|b| b < BANDWIDTH_TIGHT),
        ),
        (
            Phase::Markup,
            PRIMARY_RULE_POINTS,
            trend.is_bullish() && funding_rate > 0.0 && oi_delta > 0.0,
        ),
        (
            Phase::Markup,
            SECONDARY_RULE_POINTS,
            rsi.is_some_and(|r| r > RSI_HIGH_THRESHOLD) && cross.is_golden(),
        ),
        (
            Phase::Distribution,
            PRIMARY_RULE_POINTS,
            trend == Trend::StrongBullish && funding_rate > DISTRIBUTION_FUNDING_THRESHOLD,
        ),
        (
            Phase::Distribution,
            SECONDARY_RULE_POINTS,
            rsi.is_some_and(|r| r > RSI_OVERHEATED_THRESHOLD)
                && bandwidth.is_some_and(|b| b > BANDWIDTH_WIDE),
        ),
        (
            Phase::Markdown,
            PRIMARY_RULE_POINTS,
            trend.is_bearish() && oi_delta < 0.0,
        ),
        (
            Phase::Markdown,
            SECONDARY_RULE_POINTS,
            rsi.is_some_and(|r| r < RSI_LOW_THRESHOLD) && cross.is_death(),
        ),
        (
            Phase::Rebalancing,
            PRIMARY_RULE_POINTS,
            trend == Trend::Ranging && funding_rate.abs() < REBALANCING_FUNDING_BAND,
        ),
        (
            Phase::Rebalancing,
            SQUEEZE_RULE_POINTS,
            bandwidth.is_some_and(|b| b < BANDWIDTH_SQUEEZE),
        ),
    ];

    let mut scores = PhaseScores::default();
    for (phase, points, hit) in rules {
        if hit {
            scores.add(phase, points);
        }
    }

    // Maximum score, strict comparison: the first phase in declaration order
    // keeps the win on ties.
    let mut selected = Phase::Accumulation;
    let mut best = scores.score(selected);
    for &phase in &Phase::ALL[1..] {
        let s = scores.score(phase);
        if s > best {
            selected = phase;
            best = s;
        }
    }

    debug!(
        phase = %selected,
        confidence = best,
        funding_rate = format!("{:.4}", funding_rate),
        oi_delta = format!("{:+.0}", oi_delta),
        "phase classified"
    );

    PhaseResult {
        scores,
        selected,
        confidence: best,
    }
}
