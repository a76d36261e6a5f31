//! Drawing types for persisted chart annotations.
//!
//! A drawing is a flat wire object discriminated by its `tool` field. The
//! geometry of each kind lives in its own struct so a two-point drawing can
//! never exist with only one endpoint.

use serde::{Deserialize, Serialize};

/// Default Fibonacci retracement levels.
pub const DEFAULT_FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// Default colors per drawing tool.
pub const HORIZONTAL_LINE_COLOR: &str = "#f59e0b"; // amber
pub const TREND_LINE_COLOR: &str = "#3b82f6"; // blue
pub const FIBONACCI_COLOR: &str = "#8b5cf6"; // purple
pub const RECTANGLE_COLOR: &str = "#22c55e"; // green

/// Active chart tool. `Cursor` is the no-op default; the other four create
/// drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Cursor,
    HorizontalLine,
    TrendLine,
    Fibonacci,
    Rectangle,
}

impl Tool {
    /// Wire name of this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::HorizontalLine => "horizontal_line",
            Tool::TrendLine => "trend_line",
            Tool::Fibonacci => "fibonacci",
            Tool::Rectangle => "rectangle",
        }
    }

    /// Check if this tool creates drawings.
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, Tool::Cursor)
    }

    /// Check if this tool needs two clicks to define its geometry.
    pub fn is_two_point(&self) -> bool {
        matches!(self, Tool::TrendLine | Tool::Fibonacci | Tool::Rectangle)
    }

    /// Default color for drawings created with this tool.
    pub fn default_color(&self) -> &'static str {
        match self {
            Tool::Cursor | Tool::HorizontalLine => HORIZONTAL_LINE_COLOR,
            Tool::TrendLine => TREND_LINE_COLOR,
            Tool::Fibonacci => FIBONACCI_COLOR,
            Tool::Rectangle => RECTANGLE_COLOR,
        }
    }

    /// All tools, cursor first.
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Cursor,
            Tool::HorizontalLine,
            Tool::TrendLine,
            Tool::Fibonacci,
            Tool::Rectangle,
        ]
    }
}

/// Rendered line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// A horizontal line pinned to a single price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalLine {
    pub price: f64,
}

/// A trend line between two (time, price) points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    pub start_time: i64,
    pub start_price: f64,
    pub end_time: i64,
    pub end_price: f64,
}

/// A Fibonacci retracement spanning two points, with level ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fibonacci {
    pub start_time: i64,
    pub start_price: f64,
    pub end_time: i64,
    pub end_price: f64,
    #[serde(default = "default_fib_levels")]
    pub levels: Vec<f64>,
}

fn default_fib_levels() -> Vec<f64> {
    DEFAULT_FIB_LEVELS.to_vec()
}

impl Fibonacci {
    /// Price of one retracement level: `start + (end - start) * level`.
    pub fn level_price(&self, level: f64) -> f64 {
        self.start_price + (self.end_price - self.start_price) * level
    }
}

/// A rectangle defined by two opposite corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub start_time: i64,
    pub start_price: f64,
    pub end_time: i64,
    pub end_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

impl Rectangle {
    pub fn top_price(&self) -> f64 {
        self.start_price.max(self.end_price)
    }

    pub fn bottom_price(&self) -> f64 {
        self.start_price.min(self.end_price)
    }
}

/// Tool-specific geometry, discriminated on the wire by the `tool` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum Geometry {
    HorizontalLine(HorizontalLine),
    TrendLine(TrendLine),
    Fibonacci(Fibonacci),
    Rectangle(Rectangle),
}

impl Geometry {
    /// The tool that creates this kind of geometry.
    pub fn tool(&self) -> Tool {
        match self {
            Geometry::HorizontalLine(_) => Tool::HorizontalLine,
            Geometry::TrendLine(_) => Tool::TrendLine,
            Geometry::Fibonacci(_) => Tool::Fibonacci,
            Geometry::Rectangle(_) => Tool::Rectangle,
        }
    }
}

/// A persisted drawing record, owned by one symbol + timeframe pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: String,
    pub symbol: String,
    pub timeframe: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub visible: bool,
    pub locked: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Drawing {
    pub fn tool(&self) -> Tool {
        self.geometry.tool()
    }

    /// Merge a partial update into this drawing. Geometry fields only apply
    /// where the variant carries them; the tool kind itself cannot change.
    pub fn apply(&mut self, patch: &DrawingPatch) {
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(width) = patch.line_width {
            self.line_width = width;
        }
        if let Some(style) = patch.line_style {
            self.line_style = style;
        }
        if let Some(label) = &patch.label {
            self.label = Some(label.clone());
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }

        match &mut self.geometry {
            Geometry::HorizontalLine(line) => {
                if let Some(price) = patch.price {
                    line.price = price;
                }
            }
            Geometry::TrendLine(line) => {
                apply_span(
                    patch,
                    &mut line.start_time,
                    &mut line.start_price,
                    &mut line.end_time,
                    &mut line.end_price,
                );
            }
            Geometry::Fibonacci(fib) => {
                apply_span(
                    patch,
                    &mut fib.start_time,
                    &mut fib.start_price,
                    &mut fib.end_time,
                    &mut fib.end_price,
                );
                if let Some(levels) = &patch.levels {
                    fib.levels = levels.clone();
                }
            }
            Geometry::Rectangle(rect) => {
                apply_span(
                    patch,
                    &mut rect.start_time,
                    &mut rect.start_price,
                    &mut rect.end_time,
                    &mut rect.end_price,
                );
                if let Some(fill) = &patch.fill_color {
                    rect.fill_color = Some(fill.clone());
                }
            }
        }
    }
}

fn apply_span(
    patch: &DrawingPatch,
    start_time: &mut i64,
    start_price: &mut f64,
    end_time: &mut i64,
    end_price: &mut f64,
) {
    if let Some(t) = patch.start_time {
        *start_time = t;
    }
    if let Some(p) = patch.start_price {
        *start_price = p;
    }
    if let Some(t) = patch.end_time {
        *end_time = t;
    }
    if let Some(p) = patch.end_price {
        *end_price = p;
    }
}

/// Input for creating a drawing; the server assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingCreate {
    pub symbol: String,
    pub timeframe: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub visible: bool,
    pub locked: bool,
}

impl DrawingCreate {
    pub fn tool(&self) -> Tool {
        self.geometry.tool()
    }

    /// Client-side validation mirroring the server's create schema: hex
    /// color, line width 1-5, label at most 50 chars.
    pub fn validate(&self) -> Result<(), String> {
        if !is_hex_color(&self.color) {
            return Err(format!("invalid hex color: {}", self.color));
        }
        if !(1..=5).contains(&self.line_width) {
            return Err(format!("line width out of range: {}", self.line_width));
        }
        if let Some(label) = &self.label {
            if label.len() > 50 {
                return Err("label exceeds 50 characters".to_string());
            }
        }
        Ok(())
    }
}

fn is_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Partial update payload; the tool kind cannot change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}
