//! Candle source trait definition.

use chartdesk_core::Timeframe;
use serde_json::Value;

/// Trait for types that can load raw candle payloads.
///
/// This trait uses `anyhow::Result` for flexible error handling. A failed
/// fetch is surfaced to the caller; data-quality problems inside a successful
/// response are the normalizer's job.
pub trait CandleSource {
    fn fetch(
        &self,
        symbol: &str,
        resolution: Timeframe,
        count: usize,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Value>>>;
}
