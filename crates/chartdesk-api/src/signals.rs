//! Read-only recent-signals feed.

use chartdesk_core::Signal;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;

/// Response envelope for the signals feed.
#[derive(Debug, Deserialize)]
pub struct SignalsResponse {
    pub ok: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// Signals feed endpoint wrapper.
#[derive(Debug, Clone)]
pub struct SignalsApi {
    client: ApiClient,
}

impl SignalsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the most recent signals, optionally filtered by symbol.
    pub async fn recent(&self, symbol: Option<&str>, limit: usize) -> Result<Vec<Signal>> {
        let mut params = vec![("limit", limit.to_string())];
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_string()));
        }

        let response: SignalsResponse = self.client.get_json("/signals", &params).await?;
        Ok(response.signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signals_response_parsing() {
        let response: SignalsResponse = serde_json::from_value(json!({
            "ok": true,
            "count": 1,
            "signals": [{
                "signal_id": "s1",
                "symbol": "XAUUSD",
                "direction": "BUY",
                "entry": 2000.0,
                "sl": 1990.0,
                "tp": 2020.0,
                "rr": 2.0,
                "created_at": 1700000000
            }]
        }))
        .unwrap();
        assert_eq!(response.signals.len(), 1);
        assert_eq!(response.signals[0].entry, Some(2000.0));
    }
}
