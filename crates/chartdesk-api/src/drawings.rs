//! Drawing persistence endpoints.

use chartdesk_core::{Drawing, DrawingCreate, DrawingPatch};
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;

/// Response envelope for the drawing list endpoint.
#[derive(Debug, Deserialize)]
pub struct DrawingsResponse {
    pub ok: bool,
    #[serde(default)]
    pub drawings: Vec<Drawing>,
    #[serde(default)]
    pub count: usize,
}

/// Response envelope for single-drawing endpoints.
#[derive(Debug, Deserialize)]
pub struct DrawingResponse {
    pub ok: bool,
    pub drawing: Drawing,
}

/// Drawing CRUD endpoint wrapper.
#[derive(Debug, Clone)]
pub struct DrawingsApi {
    client: ApiClient,
}

impl DrawingsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch all drawings for a symbol + timeframe pair.
    pub async fn fetch(&self, symbol: &str, timeframe: &str) -> Result<Vec<Drawing>> {
        let response: DrawingsResponse = self
            .client
            .get_json(
                "/drawings",
                &[
                    ("symbol", symbol.to_string()),
                    ("timeframe", timeframe.to_string()),
                ],
            )
            .await?;

        log::debug!(
            "fetched {} drawings for {symbol} {timeframe}",
            response.drawings.len()
        );
        Ok(response.drawings)
    }

    /// Create a drawing; the server assigns id and timestamps.
    pub async fn create(&self, input: &DrawingCreate) -> Result<Drawing> {
        let response: DrawingResponse = self.client.post_json("/drawings", input).await?;
        Ok(response.drawing)
    }

    /// Apply a partial update and return the updated record.
    pub async fn update(&self, id: &str, patch: &DrawingPatch) -> Result<Drawing> {
        let response: DrawingResponse = self
            .client
            .patch_json(&format!("/drawings/{id}"), patch)
            .await?;
        Ok(response.drawing)
    }

    /// Delete one drawing by id.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.client.delete(&format!("/drawings/{id}"), &[]).await?;
        Ok(true)
    }

    /// Bulk-delete every drawing for a symbol + timeframe pair.
    pub async fn clear_all(&self, symbol: &str, timeframe: &str) -> Result<bool> {
        self.client
            .delete(
                "/drawings",
                &[
                    ("symbol", symbol.to_string()),
                    ("timeframe", timeframe.to_string()),
                ],
            )
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drawings_response_defaults() {
        let response: DrawingsResponse = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(response.ok);
        assert!(response.drawings.is_empty());
        assert_eq!(response.count, 0);
    }

    #[test]
    fn test_drawings_response_with_records() {
        let response: DrawingsResponse = serde_json::from_value(json!({
            "ok": true,
            "count": 1,
            "drawings": [{
                "id": "d1",
                "symbol": "XAUUSD",
                "timeframe": "M5",
                "tool": "horizontal_line",
                "price": 2000.0,
                "color": "#f59e0b",
                "lineWidth": 1,
                "lineStyle": "solid",
                "visible": true,
                "locked": false,
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-01-01T00:00:00Z"
            }]
        }))
        .unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.drawings[0].id, "d1");
    }
}
