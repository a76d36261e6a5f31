//! Remote candle source backed by the dashboard API.

use anyhow::Context;
use chartdesk_api::{ApiClient, MarketApi};
use chartdesk_core::Timeframe;
use serde_json::Value;

use crate::source::CandleSource;

/// Candle source that fetches from the dashboard backend.
#[derive(Debug, Clone)]
pub struct RemoteCandles {
    market: MarketApi,
}

impl RemoteCandles {
    pub fn new(client: ApiClient) -> Self {
        Self {
            market: MarketApi::new(client),
        }
    }
}

impl CandleSource for RemoteCandles {
    async fn fetch(
        &self,
        symbol: &str,
        resolution: Timeframe,
        count: usize,
    ) -> anyhow::Result<Vec<Value>> {
        let raw = self
            .market
            .candles(symbol, resolution, count)
            .await
            .context("failed to fetch candles")?;

        log::debug!(
            "fetched {} raw candles for {symbol} {}",
            raw.len(),
            resolution.label()
        );
        Ok(raw)
    }
}
