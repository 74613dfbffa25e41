// =============================================================================
// cyclescope — full-cycle technical analysis from a market-maker perspective
// =============================================================================
//
// Fetches candles and derivative metrics for one symbol across several
// timeframes, computes indicator snapshots, classifies the market phase,
// generates scenario paths and prints the full console report. Falls back
// to a deterministic demo market when the API is unreachable.
// =============================================================================

mod analysis;
mod binance;
mod config;
mod demo;
mod indicators;
mod phase;
mod report;
mod signal_strength;
mod suggestions;
mod types;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use futures_util::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analysis::CycleAnalysis;
use crate::binance::MarketDataClient;
use crate::config::AnalysisConfig;
use crate::types::{Candle, MarketContext};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AnalysisConfig::from_env();
    if std::env::args().any(|a| a == "--demo") {
        config.demo = true;
    }

    info!(
        symbol = %config.symbol,
        intervals = ?config.intervals,
        primary = %config.primary_interval,
        demo = config.demo,
        "cyclescope starting"
    );

    let analysis = if config.demo {
        run_demo(&config)
    } else {
        match run_live(&config).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!(error = %e, "live analysis failed — falling back to demo mode");
                run_demo(&config)
            }
        }
    };

    match analysis {
        Some(analysis) => {
            report::render_full(&analysis);
            Ok(())
        }
        None => anyhow::bail!("no analysable data for {}", config.symbol),
    }
}

/// Fetch real market data and analyse it.
async fn run_live(config: &AnalysisConfig) -> Result<CycleAnalysis> {
    let client = MarketDataClient::new();

    let context = client.fetch_market_context(&config.symbol).await?;

    // Per-interval kline fetches are independent — run them concurrently.
    let fetches = config.intervals.iter().map(|interval| {
        let client = client.clone();
        let symbol = config.symbol.clone();
        let interval = interval.clone();
        let limit = config.candle_limit;
        async move {
            let candles = client.fetch_klines(&symbol, &interval, limit).await;
            (interval, candles)
        }
    });

    let mut interval_candles: Vec<(String, Vec<Candle>)> = Vec::new();
    for (interval, result) in join_all(fetches).await {
        match result {
            Ok(candles) => interval_candles.push((interval, candles)),
            Err(e) => {
                warn!(interval = %interval, error = %e, "kline fetch failed — skipping interval")
            }
        }
    }

    if interval_candles.is_empty() {
        anyhow::bail!("no interval returned any candles");
    }

    analysis::analyze(
        &config.symbol,
        &interval_candles,
        &context,
        &config.primary_interval,
    )
    .ok_or_else(|| anyhow::anyhow!("analysis produced no result"))
}

/// Analyse a deterministic synthetic market.
fn run_demo(config: &AnalysisConfig) -> Option<CycleAnalysis> {
    info!("demo mode — using synthetic market data");

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    let seed = (now_ms / 3_600_000) as u64;

    // One synthetic series reused across every timeframe — enough to
    // exercise all the report panels.
    let candles = demo::generate_candles(seed, demo::DEMO_CANDLE_COUNT, now_ms);
    let context: MarketContext = demo::generate_context(seed);

    let interval_candles: Vec<(String, Vec<Candle>)> = config
        .intervals
        .iter()
        .map(|iv| (iv.clone(), candles.clone()))
        .collect();

    analysis::analyze(
        &config.symbol,
        &interval_candles,
        &context,
        &config.primary_interval,
    )
}
