// =============================================================================
// Binance Futures Market-Data Client — public REST endpoints only
// =============================================================================
//
// Everything this tool consumes is public market data: klines, the latest
// funding rate, open interest and the top-trader long/short ratio. No API
// key, no signing, no retries — a failed fetch bubbles up as an error and
// the caller decides whether to fall back to demo mode.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::types::{Candle, MarketContext};

const FAPI_BASE: &str = "https://fapi.binance.com";

/// HTTP client for the Binance USDⓈ-M futures public API.
#[derive(Clone)]
pub struct MarketDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketDataClient {
    /// Create a client with a default 10-second timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("failed to build reqwest client for MarketDataClient"),
            base_url: FAPI_BASE.to_string(),
        }
    }

    /// Create a client that re-uses an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: FAPI_BASE.to_string(),
        }
    }

    async fn get_json(&self, path_and_query: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("parse response body of {url}"))?;

        if !status.is_success() {
            anyhow::bail!("{url} returned {status}: {body}");
        }
        Ok(body)
    }

    /// Fetch up to `limit` klines for `symbol` at `interval`, oldest first.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let body = self
            .get_json(&format!(
                "/fapi/v1/klines?symbol={symbol}&interval={interval}&limit={limit}"
            ))
            .await?;

        let rows = body.as_array().context("klines response is not an array")?;
        let mut candles = Vec::with_capacity(rows.len());
        for row in rows {
            candles.push(parse_kline_row(row)?);
        }

        debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    /// Fetch the latest funding rate as a signed fraction.
    pub async fn fetch_funding_rate(&self, symbol: &str) -> Result<f64> {
        let body = self
            .get_json(&format!("/fapi/v1/fundingRate?symbol={symbol}&limit=1"))
            .await?;

        let entry = body
            .as_array()
            .and_then(|a| a.first())
            .context("funding rate response is empty")?;

        let rate = entry["fundingRate"]
            .as_str()
            .context("fundingRate field missing")?
            .parse::<f64>()
            .context("fundingRate is not a number")?;

        debug!(symbol, rate, "funding rate fetched");
        Ok(rate)
    }

    /// Fetch the current open interest in contracts.
    pub async fn fetch_open_interest(&self, symbol: &str) -> Result<f64> {
        let body = self
            .get_json(&format!("/fapi/v1/openInterest?symbol={symbol}"))
            .await?;

        let oi = body["openInterest"]
            .as_str()
            .context("openInterest field missing")?
            .parse::<f64>()
            .context("openInterest is not a number")?;

        debug!(symbol, oi, "open interest fetched");
        Ok(oi)
    }

    /// Fetch the latest top-trader long/short account ratio.
    pub async fn fetch_long_short_ratio(&self, symbol: &str) -> Result<f64> {
        let body = self
            .get_json(&format!(
                "/futures/data/topLongShortAccountRatio?symbol={symbol}&period=1h&limit=1"
            ))
            .await?;

        let entry = body
            .as_array()
            .and_then(|a| a.first())
            .context("long/short ratio response is empty")?;

        let ratio = entry["longShortRatio"]
            .as_str()
            .context("longShortRatio field missing")?
            .parse::<f64>()
            .context("longShortRatio is not a number")?;

        debug!(symbol, ratio, "long/short ratio fetched");
        Ok(ratio)
    }

    /// Bundle the derivative-market context for one symbol.
    ///
    /// The funding rate is required (its failure aborts the bundle and
    /// triggers the caller's demo fallback); OI and the long/short ratio
    /// degrade to their inert defaults with a warning. Only a single OI
    /// sample exists per run, so the delta is reported as 0.
    pub async fn fetch_market_context(&self, symbol: &str) -> Result<MarketContext> {
        let funding_rate = self.fetch_funding_rate(symbol).await?;

        let open_interest = match self.fetch_open_interest(symbol).await {
            Ok(oi) => oi,
            Err(e) => {
                warn!(symbol, error = %e, "open interest unavailable — using 0");
                0.0
            }
        };

        let long_short_ratio = match self.fetch_long_short_ratio(symbol).await {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(symbol, error = %e, "long/short ratio unavailable");
                None
            }
        };

        Ok(MarketContext {
            funding_rate,
            open_interest,
            open_interest_delta: 0.0,
            long_short_ratio,
        })
    }
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode one kline row: `[openTime, "o", "h", "l", "c", "v", ...]`.
fn parse_kline_row(row: &serde_json::Value) -> Result<Candle> {
    let arr = row.as_array().context("kline row is not an array")?;
    if arr.len() < 6 {
        anyhow::bail!("kline row has {} fields, expected at least 6", arr.len());
    }

    let open_time = arr[0].as_i64().context("kline open time is not an integer")?;
    let field = |idx: usize, name: &str| -> Result<f64> {
        arr[idx]
            .as_str()
            .with_context(|| format!("kline {name} is not a string"))?
            .parse::<f64>()
            .with_context(|| format!("kline {name} is not a number"))
    };

    Ok(Candle {
        open_time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}
