//! Chart session: the composition root of one mounted chart.
//!
//! Owns the state store, the tool machine, the rendering adapter and the
//! gateway handles, and serializes every mutation through the UI task. The
//! session is also where the concurrency rules live: candle and drawing
//! fetches are keyed by (symbol, timeframe) and stale responses are
//! discarded rather than aborted, and persistence failures roll back their
//! optimistic local updates.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chartdesk_core::{
    Candle, Drawing, DrawingCreate, DrawingPatch, EntrySignal, Resampler, Signal, Timeframe, Tool,
};
use chartdesk_data::{normalize_candles, CandleSource};
use serde_json::Value;

use crate::gateway::DrawingGateway;
use crate::store::ChartStore;
use crate::surface::{ClickEvent, SurfaceFactory, SurfaceOptions};
use crate::tools::{ToolAction, ToolMachine};
use crate::view::{resolve_click, RenderingAdapter};

/// Identity of an in-flight fetch. A response only applies while the chart
/// still shows the same symbol + timeframe it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

/// Candle loading state surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Zero valid candles after normalization - shown as "no data", not as
    /// an error.
    NoData,
    /// Fetch failed; retry is manual.
    Failed(String),
}

/// Transient user-visible notification from a failed persistence call.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    DrawingCreateFailed(String),
    DrawingUpdateFailed(String),
    DrawingDeleteFailed(String),
    ClearAllFailed(String),
}

/// Session construction parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub surface: SurfaceOptions,
    /// How many candles of the active timeframe a fetch should cover.
    pub target_candles: usize,
    /// Maximum number of entry signals overlaid at once.
    pub signal_overlay_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            symbol: "XAUUSD".to_string(),
            timeframe: Timeframe::Min5,
            surface: SurfaceOptions {
                width: 1280,
                height: 500,
            },
            target_candles: 200,
            signal_overlay_limit: 5,
        }
    }
}

pub struct ChartSession<C, G, F>
where
    C: CandleSource,
    G: DrawingGateway,
    F: SurfaceFactory,
{
    store: ChartStore,
    machine: ToolMachine,
    adapter: RenderingAdapter<F>,
    resampler: Resampler,
    source: C,
    gateway: G,
    base_candles: Arc<Vec<Candle>>,
    load: LoadState,
    drawings_error: Option<String>,
    notices: Vec<Notice>,
    signals: Vec<EntrySignal>,
    target_candles: usize,
    signal_limit: usize,
}

impl<C, G, F> ChartSession<C, G, F>
where
    C: CandleSource,
    G: DrawingGateway,
    F: SurfaceFactory,
{
    pub fn new(source: C, gateway: G, factory: F, config: SessionConfig) -> Self {
        Self {
            store: ChartStore::new(config.symbol, config.timeframe),
            machine: ToolMachine::new(),
            adapter: RenderingAdapter::new(factory, config.surface),
            resampler: Resampler::new(),
            source,
            gateway,
            base_candles: Arc::new(Vec::new()),
            load: LoadState::Loading,
            drawings_error: None,
            notices: Vec::new(),
            signals: Vec::new(),
            target_candles: config.target_candles,
            signal_limit: config.signal_overlay_limit,
        }
    }

    pub fn store(&self) -> &ChartStore {
        &self.store
    }

    pub fn adapter(&self) -> &RenderingAdapter<F> {
        &self.adapter
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn drawings_error(&self) -> Option<&str> {
        self.drawings_error.as_deref()
    }

    pub fn base_candles(&self) -> &Arc<Vec<Candle>> {
        &self.base_candles
    }

    pub fn entry_signals(&self) -> &[EntrySignal] {
        &self.signals
    }

    /// Take the pending persistence-failure notifications.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The key any fetch started right now would carry.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            symbol: self.store.symbol().to_string(),
            timeframe: self.store.timeframe(),
        }
    }

    // --- instrument switching -----------------------------------------------

    /// Switch instrument. Drawings and selection clear synchronously, the
    /// stale series is dropped, and any in-progress drawing is cancelled; the
    /// caller follows up with `refresh_candles` + `refresh_drawings`.
    pub fn switch_symbol(&mut self, symbol: &str) {
        self.cancel_drawing();
        self.store.set_symbol(symbol);
        self.base_candles = Arc::new(Vec::new());
        self.signals.clear();
        self.load = LoadState::Loading;
        self.refresh_series();
    }

    /// Switch timeframe. The current base series resamples immediately for
    /// instant feedback; the caller still refetches to widen the window.
    pub fn switch_timeframe(&mut self, timeframe: Timeframe) {
        self.cancel_drawing();
        self.store.set_timeframe(timeframe);
        self.load = LoadState::Loading;
        self.refresh_series();
    }

    /// Change the active tool; any in-progress drawing is abandoned.
    pub fn select_tool(&mut self, tool: Tool) {
        self.cancel_drawing();
        self.store.set_active_tool(tool);
    }

    // --- candles ------------------------------------------------------------

    /// Fetch the base-resolution candle window for the current key.
    pub async fn refresh_candles(&mut self) {
        let key = self.fetch_key();
        self.load = LoadState::Loading;

        let count = key.timeframe.base_candles_needed(self.target_candles);
        let result = self.source.fetch(&key.symbol, Timeframe::BASE, count).await;
        self.apply_candles(key, result);
    }

    /// Apply a completed candle fetch. Responses for a stale key are
    /// discarded - that is the only cancellation mechanism.
    pub fn apply_candles(&mut self, key: FetchKey, result: anyhow::Result<Vec<Value>>) {
        if key != self.fetch_key() {
            log::info!(
                "discarding stale candle response for {} {}",
                key.symbol,
                key.timeframe.label()
            );
            return;
        }

        match result {
            Ok(raw) => {
                let candles = normalize_candles(&raw);
                log::info!(
                    "loaded {} raw candles, {} after validation",
                    raw.len(),
                    candles.len()
                );
                self.load = if candles.is_empty() {
                    LoadState::NoData
                } else {
                    LoadState::Ready
                };
                self.base_candles = Arc::new(candles);
                self.refresh_series();
            }
            Err(err) => {
                log::error!("candle fetch failed: {err:#}");
                self.load = LoadState::Failed(err.to_string());
            }
        }
    }

    // --- drawings -----------------------------------------------------------

    /// Fetch the persisted drawings for the current key.
    pub async fn refresh_drawings(&mut self) {
        let key = self.fetch_key();
        let result = self.gateway.fetch(&key.symbol, key.timeframe.label()).await;
        self.apply_drawings(key, result);
    }

    /// Apply a completed drawings fetch, discarding stale responses.
    pub fn apply_drawings(&mut self, key: FetchKey, result: anyhow::Result<Vec<Drawing>>) {
        if key != self.fetch_key() {
            log::info!(
                "discarding stale drawings response for {} {}",
                key.symbol,
                key.timeframe.label()
            );
            return;
        }

        match result {
            Ok(drawings) => {
                self.drawings_error = None;
                self.store.set_drawings(drawings);
                self.refresh_overlays();
            }
            Err(err) => {
                log::error!("drawings fetch failed: {err:#}");
                self.drawings_error = Some(err.to_string());
                self.store.set_drawings(Vec::new());
                self.refresh_overlays();
            }
        }
    }

    /// Persist a new drawing. Local state only commits once the server has
    /// assigned the record; a failure leaves the chart untouched and raises
    /// a notice.
    pub async fn submit_drawing(&mut self, input: DrawingCreate) {
        if let Err(message) = input.validate() {
            log::warn!("rejecting drawing create: {message}");
            self.notices.push(Notice::DrawingCreateFailed(message));
            return;
        }

        match self.gateway.create(&input).await {
            Ok(drawing) => {
                self.store.add_drawing(drawing);
                self.refresh_overlays();
            }
            Err(err) => {
                log::error!("drawing create failed: {err:#}");
                self.notices.push(Notice::DrawingCreateFailed(err.to_string()));
            }
        }
    }

    /// Delete a drawing optimistically; on failure the record is reinstated
    /// at its original position.
    pub async fn delete_drawing(&mut self, id: &str) {
        let Some(index) = self.store.drawing_index(id) else {
            return;
        };
        let removed = self.store.drawings()[index].clone();
        self.store.remove_drawing(id);
        self.refresh_overlays();

        let reason = match self.gateway.delete(id).await {
            Ok(true) => return,
            Ok(false) => "server refused the delete".to_string(),
            Err(err) => err.to_string(),
        };

        log::error!("drawing delete failed: {reason}");
        self.store.insert_drawing(index, removed);
        self.refresh_overlays();
        self.notices.push(Notice::DrawingDeleteFailed(reason));
    }

    /// Apply a partial update through the gateway, then locally.
    pub async fn update_drawing(&mut self, id: &str, patch: DrawingPatch) {
        match self.gateway.update(id, &patch).await {
            Ok(_) => {
                self.store.update_drawing(id, &patch);
                self.refresh_overlays();
            }
            Err(err) => {
                log::error!("drawing update failed: {err:#}");
                self.notices.push(Notice::DrawingUpdateFailed(err.to_string()));
            }
        }
    }

    /// Bulk-delete all drawings for the current key; local state clears only
    /// on gateway success.
    pub async fn clear_all_drawings(&mut self) {
        let key = self.fetch_key();
        match self.gateway.clear_all(&key.symbol, key.timeframe.label()).await {
            Ok(true) => {
                self.store.clear_all_drawings();
                self.refresh_overlays();
            }
            Ok(false) => {
                self.notices
                    .push(Notice::ClearAllFailed("server refused the clear".to_string()));
            }
            Err(err) => {
                log::error!("clear-all failed: {err:#}");
                self.notices.push(Notice::ClearAllFailed(err.to_string()));
            }
        }
    }

    // --- pointer / keyboard -------------------------------------------------

    /// Feed a surface click through the tool machine. Returns the create
    /// input when the click completed a drawing; the caller persists it.
    pub fn apply_click(&mut self, click: ClickEvent) -> Option<DrawingCreate> {
        let tool = self.store.active_tool();
        if !tool.is_drawing_tool() {
            return None;
        }

        let point = {
            let surface = self.adapter.surface()?;
            resolve_click(&click, surface, now_unix())?
        };

        match self.machine.handle_click(tool, point) {
            ToolAction::Ignored => None,
            ToolAction::Started { preview } => {
                self.store.set_is_drawing(true);
                if let Some(price) = preview {
                    self.adapter.show_preview(price, tool.default_color());
                }
                None
            }
            ToolAction::Completed(draft) => {
                self.adapter.clear_preview();
                self.store.set_is_drawing(false);
                self.store.set_active_tool(Tool::Cursor);
                Some(draft.into_create(self.store.symbol(), self.store.timeframe().label()))
            }
        }
    }

    /// Click handling plus persistence of a completed drawing.
    pub async fn handle_click(&mut self, click: ClickEvent) {
        if let Some(input) = self.apply_click(click) {
            self.submit_drawing(input).await;
        }
    }

    /// Escape: abandon an in-progress two-point drawing. Never touches the
    /// network; the armed tool stays armed.
    pub fn handle_escape(&mut self) {
        if self.machine.cancel() {
            self.store.set_is_drawing(false);
            self.adapter.clear_preview();
        }
    }

    /// Window resize: re-apply the container width.
    pub fn handle_resize(&mut self, width: u32) {
        self.adapter.handle_resize(width);
    }

    /// Change the surface height; the surface is torn down and rebuilt
    /// around the same series.
    pub fn set_height(&mut self, height: u32) {
        self.adapter.set_height(height);
        self.refresh_series();
    }

    // --- signals ------------------------------------------------------------

    /// Map fresh feed signals onto the entry overlay for the current symbol.
    pub fn apply_signals(&mut self, signals: &[Signal]) {
        self.signals = EntrySignal::from_signals(signals, self.store.symbol(), self.signal_limit);
        self.refresh_overlays();
    }

    // --- rendering ----------------------------------------------------------

    /// Rebuild the surface around the resampled series and repaint overlays.
    fn refresh_series(&mut self) {
        let series = self
            .resampler
            .resample(&self.base_candles, self.store.timeframe());
        self.adapter.rebuild(&series);
        self.refresh_overlays();
    }

    /// Repaint drawings and signal overlays without touching the surface.
    fn refresh_overlays(&mut self) {
        self.adapter.redraw_drawings(self.store.drawings());
        self.adapter.overlay_signals(&self.signals);
    }

    fn cancel_drawing(&mut self) {
        if self.machine.cancel() {
            self.store.set_is_drawing(false);
            self.adapter.clear_preview();
        }
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use chartdesk_core::{Geometry, HorizontalLine, LineStyle};
    use serde_json::json;

    use crate::surface::RecordingFactory;

    // --- doubles ------------------------------------------------------------

    struct StaticSource {
        payload: Vec<Value>,
    }

    impl CandleSource for StaticSource {
        async fn fetch(
            &self,
            _symbol: &str,
            _resolution: Timeframe,
            _count: usize,
        ) -> anyhow::Result<Vec<Value>> {
            Ok(self.payload.clone())
        }
    }

    struct FailingSource;

    impl CandleSource for FailingSource {
        async fn fetch(
            &self,
            _symbol: &str,
            _resolution: Timeframe,
            _count: usize,
        ) -> anyhow::Result<Vec<Value>> {
            anyhow::bail!("connection refused")
        }
    }

    #[derive(Default)]
    struct MockGateway {
        fail_create: bool,
        fail_delete: bool,
        fail_clear: bool,
        stored: RefCell<Vec<Drawing>>,
        create_calls: Cell<usize>,
        next_id: Cell<u64>,
    }

    impl MockGateway {
        fn with_drawings(drawings: Vec<Drawing>) -> Self {
            Self {
                stored: RefCell::new(drawings),
                ..Default::default()
            }
        }
    }

    impl DrawingGateway for MockGateway {
        async fn fetch(&self, _symbol: &str, _timeframe: &str) -> anyhow::Result<Vec<Drawing>> {
            Ok(self.stored.borrow().clone())
        }

        async fn create(&self, input: &DrawingCreate) -> anyhow::Result<Drawing> {
            self.create_calls.set(self.create_calls.get() + 1);
            if self.fail_create {
                anyhow::bail!("create rejected")
            }
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            Ok(Drawing {
                id: format!("srv-{id}"),
                symbol: input.symbol.clone(),
                timeframe: input.timeframe.clone(),
                geometry: input.geometry.clone(),
                color: input.color.clone(),
                line_width: input.line_width,
                line_style: input.line_style,
                label: input.label.clone(),
                visible: input.visible,
                locked: input.locked,
                created_at: "2025-01-01T00:00:00Z".to_string(),
                updated_at: "2025-01-01T00:00:00Z".to_string(),
            })
        }

        async fn update(&self, id: &str, _patch: &DrawingPatch) -> anyhow::Result<Drawing> {
            let stored = self.stored.borrow();
            stored
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("drawing not found"))
        }

        async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
            if self.fail_delete {
                anyhow::bail!("delete rejected")
            }
            Ok(true)
        }

        async fn clear_all(&self, _symbol: &str, _timeframe: &str) -> anyhow::Result<bool> {
            if self.fail_clear {
                anyhow::bail!("clear rejected")
            }
            Ok(true)
        }
    }

    // --- helpers ------------------------------------------------------------

    fn raw_candles(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "time": i as i64 * 300,
                    "open": 100.0,
                    "high": 105.0,
                    "low": 95.0,
                    "close": 100.0,
                    "volume": 10.0
                })
            })
            .collect()
    }

    fn horizontal(id: &str, price: f64) -> Drawing {
        Drawing {
            id: id.to_string(),
            symbol: "XAUUSD".to_string(),
            timeframe: "M5".to_string(),
            geometry: Geometry::HorizontalLine(HorizontalLine { price }),
            color: "#f59e0b".to_string(),
            line_width: 1,
            line_style: LineStyle::Solid,
            label: None,
            visible: true,
            locked: false,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn session_with(
        payload: Vec<Value>,
        gateway: MockGateway,
    ) -> ChartSession<StaticSource, MockGateway, RecordingFactory> {
        ChartSession::new(
            StaticSource { payload },
            gateway,
            RecordingFactory,
            SessionConfig::default(),
        )
    }

    async fn ready_session(
        gateway: MockGateway,
    ) -> ChartSession<StaticSource, MockGateway, RecordingFactory> {
        let mut session = session_with(raw_candles(50), gateway);
        session.refresh_candles().await;
        session
    }

    fn click_at(price: f64, time: i64) -> ClickEvent {
        ClickEvent {
            time: Some(time),
            series_price: Some(price),
            y: None,
        }
    }

    // --- candle loading -----------------------------------------------------

    #[tokio::test]
    async fn test_fetch_populates_series() {
        let session = ready_session(MockGateway::default()).await;

        assert_eq!(*session.load_state(), LoadState::Ready);
        assert_eq!(session.base_candles().len(), 50);
        assert!(session.adapter().has_surface());
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_retryable_error() {
        let mut session = ChartSession::new(
            FailingSource,
            MockGateway::default(),
            RecordingFactory,
            SessionConfig::default(),
        );
        session.refresh_candles().await;

        match session.load_state() {
            LoadState::Failed(message) => assert!(message.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!session.adapter().has_surface());
    }

    #[tokio::test]
    async fn test_empty_result_is_no_data_not_error() {
        let mut session = session_with(Vec::new(), MockGateway::default());
        session.refresh_candles().await;

        assert_eq!(*session.load_state(), LoadState::NoData);
        assert!(!session.adapter().has_surface());
    }

    #[tokio::test]
    async fn test_stale_candle_response_discarded() {
        let mut session = ready_session(MockGateway::default()).await;

        // A fetch for XAUUSD is "in flight" when the user switches away
        let stale_key = session.fetch_key();
        session.switch_symbol("EURUSD");

        session.apply_candles(stale_key, Ok(raw_candles(10)));

        // The late response must not populate the new instrument
        assert!(session.base_candles().is_empty());
        assert_eq!(*session.load_state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn test_stale_response_for_old_timeframe_discarded() {
        let mut session = ready_session(MockGateway::default()).await;

        let stale_key = session.fetch_key();
        session.switch_timeframe(Timeframe::Hour1);

        session.apply_candles(stale_key, Ok(raw_candles(10)));
        assert_eq!(*session.load_state(), LoadState::Loading);
    }

    #[tokio::test]
    async fn test_timeframe_switch_resamples_existing_base() {
        let mut session = ready_session(MockGateway::default()).await;
        assert_eq!(session.adapter().surface().unwrap().candles().len(), 50);

        session.switch_timeframe(Timeframe::Hour1);
        // 50 M5 candles spanning 250 minutes cover 5 hourly buckets
        assert_eq!(session.adapter().surface().unwrap().candles().len(), 5);
    }

    // --- drawings lifecycle -------------------------------------------------

    #[tokio::test]
    async fn test_refresh_drawings_populates_store_and_surface() {
        let gateway = MockGateway::with_drawings(vec![horizontal("d1", 100.0)]);
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;

        assert_eq!(session.store().drawings().len(), 1);
        assert_eq!(session.adapter().surface().unwrap().line_count(), 1);
        assert!(session.drawings_error().is_none());
    }

    #[tokio::test]
    async fn test_switch_symbol_clears_drawings_synchronously() {
        let gateway = MockGateway::with_drawings(vec![horizontal("d1", 100.0)]);
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;
        assert_eq!(session.store().drawings().len(), 1);

        // No await between the switch and this assertion: the clear is
        // synchronous
        session.switch_symbol("EURUSD");
        assert!(session.store().drawings().is_empty());
        assert_eq!(session.store().selected_drawing_id(), None);
    }

    #[tokio::test]
    async fn test_stale_drawings_response_discarded() {
        let mut session = ready_session(MockGateway::default()).await;

        let stale_key = session.fetch_key();
        session.switch_symbol("EURUSD");
        session.apply_drawings(stale_key, Ok(vec![horizontal("d1", 100.0)]));

        assert!(session.store().drawings().is_empty());
    }

    #[tokio::test]
    async fn test_drawings_fetch_failure_sets_error_and_empties_list() {
        let gateway = MockGateway::with_drawings(vec![horizontal("d1", 100.0)]);
        let mut session = ready_session(gateway).await;

        let key = session.fetch_key();
        session.apply_drawings(key, Err(anyhow::anyhow!("boom")));

        assert!(session.drawings_error().is_some());
        assert!(session.store().drawings().is_empty());
    }

    // --- tool flows ---------------------------------------------------------

    #[tokio::test]
    async fn test_horizontal_line_single_click_creates_once() {
        let mut session = ready_session(MockGateway::default()).await;
        session.select_tool(Tool::HorizontalLine);

        session.handle_click(click_at(1985.5, 3000)).await;

        assert_eq!(session.gateway.create_calls.get(), 1);
        assert_eq!(session.store().drawings().len(), 1);
        assert_eq!(session.store().drawings()[0].id, "srv-1");
        assert_eq!(session.store().active_tool(), Tool::Cursor);
        assert!(!session.store().is_drawing());
    }

    #[tokio::test]
    async fn test_trend_line_two_clicks_create_once_with_both_endpoints() {
        let mut session = ready_session(MockGateway::default()).await;
        session.select_tool(Tool::TrendLine);

        session.handle_click(click_at(100.0, 1000)).await;
        assert!(session.store().is_drawing());
        assert_eq!(session.gateway.create_calls.get(), 0);
        // dashed preview guide visible
        assert_eq!(session.adapter().surface().unwrap().line_count(), 1);

        session.handle_click(click_at(110.0, 2000)).await;
        assert_eq!(session.gateway.create_calls.get(), 1);
        assert!(!session.store().is_drawing());
        assert_eq!(session.store().active_tool(), Tool::Cursor);

        match &session.store().drawings()[0].geometry {
            Geometry::TrendLine(line) => {
                assert_eq!((line.start_time, line.end_time), (1000, 2000));
                assert_eq!((line.start_price, line.end_price), (100.0, 110.0));
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_escape_after_first_click_emits_nothing() {
        let mut session = ready_session(MockGateway::default()).await;
        session.select_tool(Tool::Fibonacci);

        session.handle_click(click_at(100.0, 1000)).await;
        assert!(session.store().is_drawing());

        session.handle_escape();
        assert!(!session.store().is_drawing());
        assert_eq!(session.gateway.create_calls.get(), 0);
        // the tool stays armed for a fresh attempt
        assert_eq!(session.store().active_tool(), Tool::Fibonacci);
    }

    #[tokio::test]
    async fn test_cursor_clicks_do_nothing() {
        let mut session = ready_session(MockGateway::default()).await;
        session.handle_click(click_at(100.0, 1000)).await;
        assert_eq!(session.gateway.create_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_create_failure_rolls_back_and_notifies() {
        let gateway = MockGateway {
            fail_create: true,
            ..Default::default()
        };
        let mut session = ready_session(gateway).await;
        session.select_tool(Tool::HorizontalLine);

        session.handle_click(click_at(1985.5, 3000)).await;

        assert!(session.store().drawings().is_empty());
        let notices = session.drain_notices();
        assert!(matches!(notices.as_slice(), [Notice::DrawingCreateFailed(_)]));
    }

    #[tokio::test]
    async fn test_delete_success_removes_locally() {
        let gateway = MockGateway::with_drawings(vec![horizontal("d1", 100.0)]);
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;

        session.delete_drawing("d1").await;
        assert!(session.store().drawings().is_empty());
        assert!(session.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_reinstates_at_original_position() {
        let gateway = MockGateway {
            fail_delete: true,
            ..MockGateway::with_drawings(vec![
                horizontal("d1", 100.0),
                horizontal("d2", 200.0),
                horizontal("d3", 300.0),
            ])
        };
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;

        session.delete_drawing("d2").await;

        let ids: Vec<&str> = session.store().drawings().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);
        let notices = session.drain_notices();
        assert!(matches!(notices.as_slice(), [Notice::DrawingDeleteFailed(_)]));
    }

    #[tokio::test]
    async fn test_clear_all_commits_on_success_only() {
        let gateway = MockGateway::with_drawings(vec![horizontal("d1", 100.0)]);
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;

        session.clear_all_drawings().await;
        assert!(session.store().drawings().is_empty());

        let gateway = MockGateway {
            fail_clear: true,
            ..MockGateway::with_drawings(vec![horizontal("d1", 100.0)])
        };
        let mut session = ready_session(gateway).await;
        session.refresh_drawings().await;

        session.clear_all_drawings().await;
        assert_eq!(session.store().drawings().len(), 1);
        let notices = session.drain_notices();
        assert!(matches!(notices.as_slice(), [Notice::ClearAllFailed(_)]));
    }

    #[tokio::test]
    async fn test_update_drawing_failure_notifies() {
        let mut session = ready_session(MockGateway::default()).await;
        session
            .update_drawing("missing", DrawingPatch::default())
            .await;
        let notices = session.drain_notices();
        assert!(matches!(notices.as_slice(), [Notice::DrawingUpdateFailed(_)]));
    }

    // --- signals ------------------------------------------------------------

    #[tokio::test]
    async fn test_signals_filtered_by_symbol_and_capped() {
        let mut session = ready_session(MockGateway::default()).await;

        let signals: Vec<Signal> = (0..8i64)
            .map(|i| Signal {
                signal_id: format!("s{i}"),
                symbol: if i == 3 { "EURUSD".to_string() } else { "XAUUSD".to_string() },
                direction: Some("BUY".to_string()),
                entry: Some(2000.0 + i as f64),
                sl: None,
                tp: None,
                rr: None,
                outcome: None,
                created_at: i,
            })
            .collect();

        session.apply_signals(&signals);
        assert_eq!(session.entry_signals().len(), 5);
        assert!(session.entry_signals().iter().all(|s| s.symbol == "XAUUSD"));
        // entry lines only (no sl/tp set)
        assert_eq!(session.adapter().surface().unwrap().line_count(), 5);
    }
}
