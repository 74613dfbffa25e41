// =============================================================================
// Trend Classification — price versus the EMA20/EMA50/EMA200 stack
// =============================================================================
//
//   price > EMA20 > EMA50 > EMA200  =>  StrongBullish
//   price < EMA20 < EMA50 < EMA200  =>  StrongBearish
//   price > EMA20 > EMA50           =>  Bullish
//   price < EMA20 < EMA50           =>  Bearish
//   otherwise                       =>  Ranging
//
// A missing EMA200 falls back to the two-EMA rule; missing EMA20/EMA50
// leaves no ordering to test, so the label is Ranging.

use serde::{Deserialize, Serialize};

/// Five-way trend label derived from the EMA stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    StrongBullish,
    Bullish,
    Ranging,
    Bearish,
    StrongBearish,
}

impl Trend {
    /// True for `Bullish` and `StrongBullish`.
    pub fn is_bullish(self) -> bool {
        matches!(self, Self::Bullish | Self::StrongBullish)
    }

    /// True for `Bearish` and `StrongBearish`.
    pub fn is_bearish(self) -> bool {
        matches!(self, Self::Bearish | Self::StrongBearish)
    }

    /// True for the fully aligned EMA-stack labels.
    pub fn is_strong(self) -> bool {
        matches!(self, Self::StrongBullish | Self::StrongBearish)
    }

    /// Compact arrow used in the multi-timeframe matrix.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::StrongBullish => "↑↑",
            Self::Bullish => "↑",
            Self::Ranging => "—",
            Self::Bearish => "↓",
            Self::StrongBearish => "↓↓",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBullish => write!(f, "Strong Bullish"),
            Self::Bullish => write!(f, "Bullish"),
            Self::Ranging => write!(f, "Ranging"),
            Self::Bearish => write!(f, "Bearish"),
            Self::StrongBearish => write!(f, "Strong Bearish"),
        }
    }
}

/// Classify the trend from the latest price and EMA values.
pub fn determine_trend(
    price: f64,
    ema20: Option<f64>,
    ema50: Option<f64>,
    ema200: Option<f64>,
) -> Trend {
    let (e20, e50) = match (ema20, ema50) {
        (Some(e20), Some(e50)) => (e20, e50),
        _ => return Trend::Ranging,
    };

    if let Some(e200) = ema200 {
        if price > e20 && e20 > e50 && e50 > e200 {
            return Trend::StrongBullish;
        }
        if price < e20 && e20 < e50 && e50 < e200 {
            return Trend::StrongBearish;
        }
    }

    if price > e20 && e20 > e50 {
        Trend::Bullish
    } else if price < e20 && e20 < e50 {
        Trend::Bearish
    } else {
        Trend::Ranging
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_bullish_requires_full_chain() {
        let t = determine_trend(110.0, Some(105.0), Some(100.0), Some(95.0));
        assert_eq!(t, Trend::StrongBullish);
    }

    #[test]
    fn strong_bearish_mirror() {
        let t = determine_trend(90.0, Some(95.0), Some(100.0), Some(105.0));
        assert_eq!(t, Trend::StrongBearish);
    }

    #[test]
    fn missing_ema200_caps_at_bullish() {
        let t = determine_trend(110.0, Some(105.0), Some(100.0), None);
        assert_eq!(t, Trend::Bullish);
    }

    #[test]
    fn broken_chain_with_ema200_falls_back() {
        // EMA50 below EMA200 breaks the strong chain, but the two-EMA rule
        // still reads bullish.
        let t = determine_trend(110.0, Some(105.0), Some(100.0), Some(102.0));
        assert_eq!(t, Trend::Bullish);
    }

    #[test]
    fn interleaved_emas_are_ranging() {
        let t = determine_trend(100.0, Some(105.0), Some(95.0), None);
        assert_eq!(t, Trend::Ranging);
    }

    #[test]
    fn missing_short_emas_are_ranging() {
        assert_eq!(determine_trend(100.0, None, None, None), Trend::Ranging);
        assert_eq!(
            determine_trend(100.0, Some(99.0), None, Some(90.0)),
            Trend::Ranging
        );
    }

    #[test]
    fn helper_predicates() {
        assert!(Trend::StrongBullish.is_bullish());
        assert!(Trend::StrongBullish.is_strong());
        assert!(Trend::Bearish.is_bearish());
        assert!(!Trend::Ranging.is_bullish());
        assert!(!Trend::Ranging.is_bearish());
        assert!(!Trend::Bullish.is_strong());
    }
}
