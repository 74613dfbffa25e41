// =============================================================================
// Signal Strength Scorer — 1-to-5 conviction rating per interval snapshot
// =============================================================================
//
// Base score 3, then:
//   +1  when the trend label is one of the "strong" variants
//   +1  when RSI is present and in an extreme band (> 70 or < 30)
//   +1  when the MACD cross happened on the latest bar
//
// Clipped to [1, 5]. Pure function of one snapshot; used to compare
// conviction across timeframes in the resonance matrix.

use crate::indicators::IndicatorSnapshot;

pub const BASE_STRENGTH: u8 = 3;
pub const MIN_STRENGTH: u8 = 1;
pub const MAX_STRENGTH: u8 = 5;

const RSI_EXTREME_HIGH: f64 = 70.0;
const RSI_EXTREME_LOW: f64 = 30.0;

/// Score the conviction of one interval's snapshot.
pub fn signal_strength(snapshot: &IndicatorSnapshot) -> u8 {
    let mut strength = BASE_STRENGTH;

    if snapshot.trend.is_strong() {
        strength += 1;
    }

    if snapshot
        .rsi
        .is_some_and(|r| r > RSI_EXTREME_HIGH || r < RSI_EXTREME_LOW)
    {
        strength += 1;
    }

    if snapshot.cross_state().is_fresh() {
        strength += 1;
    }

    strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
}

/// Star-bar rendering used by the multi-timeframe matrix.
pub fn strength_stars(strength: u8) -> String {
    let filled = strength.clamp(MIN_STRENGTH, MAX_STRENGTH) as usize;
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(5 - filled));
    stars
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{CrossState, MacdResult, RsiStatus, Trend};

    fn snapshot(trend: Trend, rsi: Option<f64>, cross: Option<CrossState>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            volume: 1_000.0,
            change_24_pct: None,
            ema20: None,
            ema50: None,
            ema200: None,
            rsi,
            rsi_status: RsiStatus::from_value(rsi),
            macd: cross.map(|c| MacdResult {
                dif: 0.0,
                dea: 0.0,
                hist: 0.0,
                cross: c,
            }),
            atr: None,
            bollinger: None,
            trend,
        }
    }

    #[test]
    fn base_score_is_three() {
        let snap = snapshot(Trend::Ranging, Some(50.0), Some(CrossState::Golden));
        assert_eq!(signal_strength(&snap), 3);
    }

    #[test]
    fn all_boosts_cap_at_five() {
        let snap = snapshot(
            Trend::StrongBullish,
            Some(75.0),
            Some(CrossState::JustGolden),
        );
        assert_eq!(signal_strength(&snap), 5);
    }

    #[test]
    fn oversold_extreme_counts() {
        let snap = snapshot(Trend::Bearish, Some(25.0), Some(CrossState::Death));
        assert_eq!(signal_strength(&snap), 4);
    }

    #[test]
    fn missing_rsi_adds_nothing() {
        let snap = snapshot(Trend::StrongBearish, None, None);
        assert_eq!(signal_strength(&snap), 4);
    }

    #[test]
    fn fresh_cross_adds_one() {
        let snap = snapshot(Trend::Ranging, Some(50.0), Some(CrossState::JustDeath));
        assert_eq!(signal_strength(&snap), 4);
    }

    #[test]
    fn stars_render_filled_and_empty() {
        assert_eq!(strength_stars(3), "★★★☆☆");
        assert_eq!(strength_stars(5), "★★★★★");
        assert_eq!(strength_stars(0), "★☆☆☆☆");
    }
}
