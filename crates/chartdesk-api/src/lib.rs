//! REST client for the dashboard backend API.
//!
//! The backend exposes candle history, drawing persistence and the recent
//! signals feed over plain JSON endpoints. This crate wraps them in typed
//! async methods on top of a shared [`ApiClient`].

pub mod client;
pub mod drawings;
pub mod error;
pub mod market;
pub mod signals;

pub use client::ApiClient;
pub use drawings::{DrawingResponse, DrawingsApi, DrawingsResponse};
pub use error::{ApiError, Error, Result};
pub use market::MarketApi;
pub use signals::{SignalsApi, SignalsResponse};
