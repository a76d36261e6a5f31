//! Chart state store - the single mutation point for per-chart state.
//!
//! Every consumer reads through the accessors and every change goes through
//! a named operation; nothing else may touch the fields. Each operation bumps
//! `version`, so callers can cheaply detect whether anything changed since
//! they last rendered.

use chartdesk_core::{Drawing, DrawingPatch, Timeframe, Tool};

/// Per-chart mutable state.
///
/// Drawings are exclusively owned by the current symbol + timeframe pair:
/// switching either clears the list (and the selection) synchronously, so a
/// slow response for the old instrument can never annotate the new one.
#[derive(Debug, Clone)]
pub struct ChartStore {
    symbol: String,
    timeframe: Timeframe,
    active_tool: Tool,
    drawings: Vec<Drawing>,
    is_drawing: bool,
    selected_drawing_id: Option<String>,
    version: u64,
}

impl ChartStore {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            active_tool: Tool::Cursor,
            drawings: Vec::new(),
            is_drawing: false,
            selected_drawing_id: None,
            version: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn selected_drawing_id(&self) -> Option<&str> {
        self.selected_drawing_id.as_deref()
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Switch instrument; drawings and selection reset for a fresh fetch.
    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
        self.drawings.clear();
        self.selected_drawing_id = None;
        self.touch();
    }

    /// Switch timeframe; drawings and selection reset for a fresh fetch.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
        self.drawings.clear();
        self.selected_drawing_id = None;
        self.touch();
    }

    /// Change the active tool. A tool change implicitly deselects.
    pub fn set_active_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
        self.selected_drawing_id = None;
        self.touch();
    }

    /// Bulk-replace the drawing list (used after a fetch).
    pub fn set_drawings(&mut self, drawings: Vec<Drawing>) {
        self.drawings = drawings;
        self.touch();
    }

    /// Prepend a drawing - newest first.
    pub fn add_drawing(&mut self, drawing: Drawing) {
        self.drawings.insert(0, drawing);
        self.touch();
    }

    /// Reinstate a drawing at a specific position (rollback of a failed
    /// optimistic delete).
    pub fn insert_drawing(&mut self, index: usize, drawing: Drawing) {
        let index = index.min(self.drawings.len());
        self.drawings.insert(index, drawing);
        self.touch();
    }

    /// Merge a partial update into the drawing with the given id.
    ///
    /// Returns false when no such drawing exists.
    pub fn update_drawing(&mut self, id: &str, patch: &DrawingPatch) -> bool {
        match self.drawings.iter_mut().find(|d| d.id == id) {
            Some(drawing) => {
                drawing.apply(patch);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Remove a drawing; clears the selection if it pointed at the removed id.
    pub fn remove_drawing(&mut self, id: &str) {
        self.drawings.retain(|d| d.id != id);
        if self.selected_drawing_id.as_deref() == Some(id) {
            self.selected_drawing_id = None;
        }
        self.touch();
    }

    /// Position of a drawing in the list, if present.
    pub fn drawing_index(&self, id: &str) -> Option<usize> {
        self.drawings.iter().position(|d| d.id == id)
    }

    pub fn clear_all_drawings(&mut self) {
        self.drawings.clear();
        self.selected_drawing_id = None;
        self.touch();
    }

    pub fn set_is_drawing(&mut self, is_drawing: bool) {
        self.is_drawing = is_drawing;
        self.touch();
    }

    pub fn set_selected_drawing_id(&mut self, id: Option<String>) {
        self.selected_drawing_id = id;
        self.touch();
    }
}
