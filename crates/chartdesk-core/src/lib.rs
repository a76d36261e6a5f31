//! Core types for the chartdesk engine.
//!
//! This crate provides the fundamental data structures shared by every other
//! crate in the workspace:
//! - `Candle` - OHLCV candle data
//! - `Timeframe` - chart resolutions and fetch-window sizing
//! - `resample` - aggregation of base-resolution candles into coarser buckets
//! - `Drawing` - persisted chart annotations (tagged union over tool kind)
//! - `Signal` - trading-signal feed records and their entry overlays

pub mod candle;
pub mod drawing;
pub mod resample;
pub mod signal;
pub mod timeframe;

pub use candle::Candle;
pub use drawing::{
    Drawing, DrawingCreate, DrawingPatch, Fibonacci, Geometry, HorizontalLine, LineStyle,
    Rectangle, Tool, TrendLine, DEFAULT_FIB_LEVELS,
};
pub use resample::{resample_candles, Resampler};
pub use signal::{Direction, EntrySignal, Outcome, Signal};
pub use timeframe::{Timeframe, MAX_CANDLE_FETCH};
