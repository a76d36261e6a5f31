//! Candle ingestion for chartdesk.
//!
//! Turns the backend's loosely-typed candle payloads into the canonical
//! [`chartdesk_core::Candle`] sequence the chart renders from.

pub mod normalize;
pub mod remote;
pub mod source;

pub use normalize::{normalize_candles, MAX_CLOSE_JUMP};
pub use remote::RemoteCandles;
pub use source::CandleSource;
