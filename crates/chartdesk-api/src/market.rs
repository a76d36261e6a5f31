//! Market data endpoints.

use chartdesk_core::Timeframe;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// Candle history endpoint wrapper.
#[derive(Debug, Clone)]
pub struct MarketApi {
    client: ApiClient,
}

impl MarketApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch raw candle payloads for a symbol at the given resolution.
    ///
    /// The backend answers with either a bare array or `{"candles": [...]}`;
    /// both shapes are accepted. Items are returned untyped - the caller is
    /// expected to run them through the normalizer.
    pub async fn candles(
        &self,
        symbol: &str,
        resolution: Timeframe,
        count: usize,
    ) -> Result<Vec<Value>> {
        let response: Value = self
            .client
            .get_json(
                "/candles",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", resolution.label().to_string()),
                    ("count", count.to_string()),
                ],
            )
            .await?;

        Ok(unwrap_candles(response))
    }
}

/// Accept both response shapes the backend is known to produce.
fn unwrap_candles(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("candles") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_bare_array() {
        let items = unwrap_candles(json!([{"time": 1}, {"time": 2}]));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unwrap_wrapped_object() {
        let items = unwrap_candles(json!({"candles": [{"time": 1}], "ok": true}));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_unwrap_unexpected_shape() {
        assert!(unwrap_candles(json!({"ok": true})).is_empty());
        assert!(unwrap_candles(json!("nope")).is_empty());
    }
}
