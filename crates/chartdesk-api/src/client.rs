//! HTTP client for the dashboard API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for making requests to the dashboard backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.get(&url).query(params).send().await?;
        Self::decode(response).await
    }

    /// Make a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    /// Make a PATCH request with a JSON body and decode the JSON response.
    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.patch(&url).json(body).send().await?;
        Self::decode(response).await
    }

    /// Make a DELETE request, succeeding on any 2xx status.
    pub(crate) async fn delete(&self, endpoint: &str, params: &[(&str, String)]) -> Result<()> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.delete(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_body(response).await;
            return Err(Error::Api(ApiError::new(status.as_u16(), message)));
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_body(response).await;
            return Err(Error::Api(ApiError::new(status.as_u16(), message)));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn error_body(response: Response) -> String {
        match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => "no response body".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_stripped() {
        let client = ApiClient::new("http://localhost:8000/api///", DEFAULT_TIMEOUT, "test").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }
}
