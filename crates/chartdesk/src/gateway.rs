//! Drawing persistence gateway seam.
//!
//! The session only sees this trait; the HTTP implementation lives in
//! `chartdesk-api`. Tests substitute an in-memory gateway.

use chartdesk_core::{Drawing, DrawingCreate, DrawingPatch};

/// Remote CRUD surface for drawing records.
pub trait DrawingGateway {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Drawing>>>;

    fn create(
        &self,
        input: &DrawingCreate,
    ) -> impl std::future::Future<Output = anyhow::Result<Drawing>>;

    fn update(
        &self,
        id: &str,
        patch: &DrawingPatch,
    ) -> impl std::future::Future<Output = anyhow::Result<Drawing>>;

    fn delete(&self, id: &str) -> impl std::future::Future<Output = anyhow::Result<bool>>;

    fn clear_all(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<bool>>;
}

impl DrawingGateway for chartdesk_api::DrawingsApi {
    async fn fetch(&self, symbol: &str, timeframe: &str) -> anyhow::Result<Vec<Drawing>> {
        Ok(chartdesk_api::DrawingsApi::fetch(self, symbol, timeframe).await?)
    }

    async fn create(&self, input: &DrawingCreate) -> anyhow::Result<Drawing> {
        Ok(chartdesk_api::DrawingsApi::create(self, input).await?)
    }

    async fn update(&self, id: &str, patch: &DrawingPatch) -> anyhow::Result<Drawing> {
        Ok(chartdesk_api::DrawingsApi::update(self, id, patch).await?)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        Ok(chartdesk_api::DrawingsApi::delete(self, id).await?)
    }

    async fn clear_all(&self, symbol: &str, timeframe: &str) -> anyhow::Result<bool> {
        Ok(chartdesk_api::DrawingsApi::clear_all(self, symbol, timeframe).await?)
    }
}
