// =============================================================================
// Demo Data — deterministic synthetic candles and derivative metrics
// =============================================================================
//
// When the Binance API is unreachable (or demo mode is requested) the
// analyzer runs on synthetic data. Generation uses a seeded xorshift64
// generator so a given seed always reproduces the same market — useful for
// demos and for tests.

use tracing::debug;

use crate::types::{Candle, MarketContext};

/// Number of candles the demo market produces by default.
pub const DEMO_CANDLE_COUNT: usize = 200;

/// Hourly bar spacing of the synthetic market, in milliseconds.
const BAR_MS: i64 = 3_600_000;

/// Starting price of the synthetic random walk.
const BASE_PRICE: f64 = 99_500.0;

/// Minimal deterministic PRNG (xorshift64) for reproducible series.
pub struct DemoRng {
    state: u64,
}

impl DemoRng {
    pub fn new(seed: u64) -> Self {
        // A zero state would be a fixed point of xorshift.
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        s
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// Generate `count` hourly candles as a bounded random walk.
///
/// Per-bar drift is uniform in [-1.5%, +1.8%] with wicks up to 0.8% beyond
/// the body, so highs always cap the body and lows always floor it.
pub fn generate_candles(seed: u64, count: usize, now_ms: i64) -> Vec<Candle> {
    let mut rng = DemoRng::new(seed);
    let mut candles = Vec::with_capacity(count);
    let mut price = BASE_PRICE;

    for i in 0..count {
        let open = price;
        let close = price * (1.0 + rng.range(-0.015, 0.018));
        let body_high = open.max(close);
        let body_low = open.min(close);
        let high = body_high * (1.0 + rng.range(0.0, 0.008));
        let low = body_low * (1.0 - rng.range(0.0, 0.008));
        let volume = rng.range(5_000.0, 15_000.0);

        candles.push(Candle {
            open_time: now_ms - (count as i64 - i as i64) * BAR_MS,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
    }

    debug!(seed, count, "demo candles generated");
    candles
}

/// Generate a plausible derivatives context to go with the demo market.
pub fn generate_context(seed: u64) -> MarketContext {
    let mut rng = DemoRng::new(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    MarketContext {
        funding_rate: rng.range(-0.0005, 0.0015),
        open_interest: rng.range(80_000.0, 120_000.0),
        open_interest_delta: 0.0,
        long_short_ratio: Some(rng.range(0.8, 1.5)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_candles(42, 50, 1_700_000_000_000);
        let b = generate_candles(42, 50, 1_700_000_000_000);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.open_time, y.open_time);
            assert!((x.close - y.close).abs() < 1e-12);
        }

        let c = generate_candles(43, 50, 1_700_000_000_000);
        assert!(a.iter().zip(c.iter()).any(|(x, y)| x.close != y.close));
    }

    #[test]
    fn candles_have_consistent_ohlc() {
        let candles = generate_candles(7, DEMO_CANDLE_COUNT, 1_700_000_000_000);
        assert_eq!(candles.len(), DEMO_CANDLE_COUNT);
        for c in &candles {
            assert!(c.high >= c.open.max(c.close), "high below body");
            assert!(c.low <= c.open.min(c.close), "low above body");
            assert!(c.volume > 0.0);
        }
    }

    #[test]
    fn candles_are_ordered_and_chained() {
        let candles = generate_candles(7, 30, 1_700_000_000_000);
        for pair in candles.windows(2) {
            assert!(pair[1].open_time > pair[0].open_time);
            // Each bar opens where the previous one closed.
            assert!((pair[1].open - pair[0].close).abs() < 1e-9);
        }
    }

    #[test]
    fn context_values_are_in_band() {
        let ctx = generate_context(99);
        assert!((-0.0005..0.0015).contains(&ctx.funding_rate));
        assert!((80_000.0..120_000.0).contains(&ctx.open_interest));
        let lsr = ctx.long_short_ratio.unwrap();
        assert!((0.8..1.5).contains(&lsr));
        assert_eq!(ctx.open_interest_delta, 0.0);
    }

    #[test]
    fn rng_stays_in_unit_interval() {
        let mut rng = DemoRng::new(1);
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
