//! chartdesk - interactive trading-chart engine.
//!
//! The engine sits between the dashboard backend and an external rendering
//! surface: it ingests and sanitizes candles, resamples them to the active
//! timeframe, runs the click-driven drawing tools, and keeps persisted
//! annotations and signal overlays in sync with the surface's price-line
//! primitives.

pub mod gateway;
pub mod session;
pub mod store;
pub mod surface;
pub mod tools;
pub mod view;

pub use gateway::DrawingGateway;
pub use session::{ChartSession, FetchKey, LoadState, Notice, SessionConfig};
pub use store::ChartStore;
pub use surface::{
    ChartSurface, ClickEvent, PriceLine, PriceLineId, RecordingFactory, RecordingSurface,
    SurfaceFactory, SurfaceOptions,
};
pub use tools::{ChartPoint, DrawingDraft, ToolAction, ToolMachine};
pub use view::{resolve_click, RenderingAdapter};
