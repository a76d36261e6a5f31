//! Drawing tool state machine.
//!
//! Two-point tools are modeled as an explicit state machine rather than
//! flags scattered across click handlers: the machine either holds no start
//! point or exactly one, and Escape-cancellation is a single transition.
//! The machine only emits drawing drafts - persistence and store updates
//! belong to the session around it.

use chartdesk_core::{
    DrawingCreate, Fibonacci, Geometry, HorizontalLine, LineStyle, Rectangle, Tool, TrendLine,
    DEFAULT_FIB_LEVELS,
};

/// A resolved (time, price) position on the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub time: i64,
    pub price: f64,
}

/// Machine state: idle, or holding the first click of a two-point tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum ToolState {
    #[default]
    Idle,
    WaitingSecondPoint {
        start: ChartPoint,
    },
}

/// Outcome of feeding one click into the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Nothing to do (cursor tool active).
    Ignored,
    /// First click of a two-point tool captured; `preview` carries the price
    /// to show a dashed guide at, when the tool wants one.
    Started { preview: Option<f64> },
    /// A complete draft ready for the persistence caller. The active tool
    /// should return to cursor.
    Completed(DrawingDraft),
}

/// A fully-formed drawing waiting for its symbol/timeframe and a server id.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingDraft {
    pub geometry: Geometry,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    pub visible: bool,
    pub locked: bool,
}

impl DrawingDraft {
    fn new(geometry: Geometry) -> Self {
        let color = geometry.tool().default_color().to_string();
        Self {
            geometry,
            color,
            line_width: 1,
            line_style: LineStyle::Solid,
            visible: true,
            locked: false,
        }
    }

    /// Attach the owning symbol + timeframe to produce the create input.
    pub fn into_create(self, symbol: &str, timeframe: &str) -> DrawingCreate {
        DrawingCreate {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            geometry: self.geometry,
            color: self.color,
            line_width: self.line_width,
            line_style: self.line_style,
            label: None,
            visible: self.visible,
            locked: self.locked,
        }
    }
}

/// Click-driven creation machine for the drawing tools.
#[derive(Debug, Default)]
pub struct ToolMachine {
    state: ToolState,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a two-point drawing is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::WaitingSecondPoint { .. })
    }

    /// The held start point, if any.
    pub fn start_point(&self) -> Option<ChartPoint> {
        match self.state {
            ToolState::WaitingSecondPoint { start } => Some(start),
            ToolState::Idle => None,
        }
    }

    /// Feed one resolved chart click into the machine.
    pub fn handle_click(&mut self, tool: Tool, point: ChartPoint) -> ToolAction {
        match tool {
            Tool::Cursor => ToolAction::Ignored,

            // Single-click placement
            Tool::HorizontalLine => {
                self.state = ToolState::Idle;
                ToolAction::Completed(DrawingDraft::new(Geometry::HorizontalLine(
                    HorizontalLine { price: point.price },
                )))
            }

            Tool::TrendLine | Tool::Fibonacci | Tool::Rectangle => match self.state {
                ToolState::Idle => {
                    self.state = ToolState::WaitingSecondPoint { start: point };
                    // Only the trend line shows a dashed guide at its start
                    let preview = (tool == Tool::TrendLine).then_some(point.price);
                    ToolAction::Started { preview }
                }
                ToolState::WaitingSecondPoint { start } => {
                    self.state = ToolState::Idle;
                    ToolAction::Completed(two_point_draft(tool, start, point))
                }
            },
        }
    }

    /// Cancel an in-progress drawing (Escape). Returns true when a start
    /// point was actually discarded.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.state = ToolState::Idle;
        was_drawing
    }
}

fn two_point_draft(tool: Tool, start: ChartPoint, end: ChartPoint) -> DrawingDraft {
    let geometry = match tool {
        Tool::TrendLine => Geometry::TrendLine(TrendLine {
            start_time: start.time,
            start_price: start.price,
            end_time: end.time,
            end_price: end.price,
        }),
        Tool::Fibonacci => Geometry::Fibonacci(Fibonacci {
            start_time: start.time,
            start_price: start.price,
            end_time: end.time,
            end_price: end.price,
            levels: DEFAULT_FIB_LEVELS.to_vec(),
        }),
        Tool::Rectangle => Geometry::Rectangle(Rectangle {
            start_time: start.time,
            start_price: start.price,
            end_time: end.time,
            end_price: end.price,
            // tool color with a low-alpha hex suffix
            fill_color: Some(format!("{}20", Tool::Rectangle.default_color())),
        }),
        Tool::Cursor | Tool::HorizontalLine => unreachable!("not a two-point tool"),
    };

    DrawingDraft::new(geometry)
}
