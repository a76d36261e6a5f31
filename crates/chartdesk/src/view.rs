//! Rendering adapter: surface life cycle and overlay redraws.
//!
//! The adapter owns the external surface for the lifetime of one loaded
//! series. It is torn down and rebuilt when the candle data or the surface
//! geometry changes, but never for a drawing or signal mutation - those only
//! touch price lines.

use chartdesk_core::{Candle, Direction, Drawing, EntrySignal, Geometry, LineStyle, Outcome};

use crate::surface::{ChartSurface, ClickEvent, PriceLine, PriceLineId, SurfaceFactory, SurfaceOptions};
use crate::tools::ChartPoint;

const GREEN: &str = "#22c55e";
const RED: &str = "#ef4444";
const BLUE: &str = "#3b82f6";
const ORANGE: &str = "#f97316";
const TEAL: &str = "#10b981";

/// Owns the surface and keeps its price lines in sync with chart state.
pub struct RenderingAdapter<F: SurfaceFactory> {
    factory: F,
    options: SurfaceOptions,
    surface: Option<F::Surface>,
    drawing_lines: Vec<PriceLineId>,
    signal_lines: Vec<PriceLineId>,
    preview_line: Option<PriceLineId>,
}

impl<F: SurfaceFactory> RenderingAdapter<F> {
    pub fn new(factory: F, options: SurfaceOptions) -> Self {
        Self {
            factory,
            options,
            surface: None,
            drawing_lines: Vec::new(),
            signal_lines: Vec::new(),
            preview_line: None,
        }
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.surface.as_ref()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Tear down and rebuild the surface around a fresh candle series.
    ///
    /// An empty series releases the surface entirely - that is the distinct
    /// "no data" presentation, not an error.
    pub fn rebuild(&mut self, candles: &[Candle]) {
        self.surface = None;
        self.drawing_lines.clear();
        self.signal_lines.clear();
        self.preview_line = None;

        if candles.is_empty() {
            return;
        }

        let mut surface = self.factory.create(&self.options);
        surface.set_candles(candles);
        surface.fit_content();
        self.surface = Some(surface);
    }

    /// Change the surface height. Takes effect on the next rebuild.
    pub fn set_height(&mut self, height: u32) {
        self.options.height = height;
    }

    /// Re-apply the container width after a window resize.
    pub fn handle_resize(&mut self, width: u32) {
        self.options.width = width;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_width(width);
        }
    }

    /// Redraw all persisted drawings from scratch.
    pub fn redraw_drawings(&mut self, drawings: &[Drawing]) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        for id in self.drawing_lines.drain(..) {
            surface.remove_price_line(id);
        }

        for drawing in drawings {
            if !drawing.visible {
                continue;
            }

            match &drawing.geometry {
                Geometry::HorizontalLine(line) => {
                    self.drawing_lines.push(surface.create_price_line(PriceLine {
                        price: line.price,
                        color: drawing.color.clone(),
                        line_width: drawing.line_width,
                        line_style: drawing.line_style,
                        axis_label_visible: true,
                        title: drawing.label.clone().unwrap_or_default(),
                    }));
                }
                // The surface only has horizontal primitives, so a trend
                // line shows as its two endpoint prices
                Geometry::TrendLine(line) => {
                    for (price, title) in [(line.start_price, "Trend Start"), (line.end_price, "Trend End")] {
                        self.drawing_lines.push(surface.create_price_line(PriceLine {
                            price,
                            color: drawing.color.clone(),
                            line_width: 1,
                            line_style: LineStyle::Dashed,
                            axis_label_visible: true,
                            title: title.to_string(),
                        }));
                    }
                }
                Geometry::Fibonacci(fib) => {
                    for level in &fib.levels {
                        self.drawing_lines.push(surface.create_price_line(PriceLine {
                            price: fib.level_price(*level),
                            color: drawing.color.clone(),
                            line_width: 1,
                            line_style: LineStyle::Dotted,
                            axis_label_visible: true,
                            title: format!("{:.1}%", level * 100.0),
                        }));
                    }
                }
                Geometry::Rectangle(rect) => {
                    for (price, title) in [(rect.top_price(), "▢ Top"), (rect.bottom_price(), "▢ Bottom")] {
                        self.drawing_lines.push(surface.create_price_line(PriceLine {
                            price,
                            color: drawing.color.clone(),
                            line_width: drawing.line_width,
                            line_style: LineStyle::Solid,
                            axis_label_visible: true,
                            title: title.to_string(),
                        }));
                    }
                }
            }
        }
    }

    /// Redraw the entry/SL/TP overlay for the given signals.
    pub fn overlay_signals(&mut self, signals: &[EntrySignal]) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        for id in self.signal_lines.drain(..) {
            surface.remove_price_line(id);
        }

        for signal in signals {
            let entry_color = match (signal.outcome, signal.direction) {
                (Some(Outcome::Win), _) => GREEN,
                (Some(Outcome::Loss), _) => RED,
                (_, Direction::Buy) => BLUE,
                (_, Direction::Sell) => ORANGE,
            };

            self.signal_lines.push(surface.create_price_line(PriceLine {
                price: signal.entry,
                color: entry_color.to_string(),
                line_width: 2,
                line_style: LineStyle::Dashed,
                axis_label_visible: true,
                title: format!("Entry {}", signal.direction.label()),
            }));

            if let Some(sl) = signal.sl {
                let color = if signal.outcome == Some(Outcome::Loss) { RED } else { ORANGE };
                self.signal_lines.push(surface.create_price_line(PriceLine {
                    price: sl,
                    color: color.to_string(),
                    line_width: 1,
                    line_style: LineStyle::Dotted,
                    axis_label_visible: true,
                    title: "SL".to_string(),
                }));
            }

            if let Some(tp) = signal.tp {
                let color = if signal.outcome == Some(Outcome::Win) { GREEN } else { TEAL };
                self.signal_lines.push(surface.create_price_line(PriceLine {
                    price: tp,
                    color: color.to_string(),
                    line_width: 1,
                    line_style: LineStyle::Dotted,
                    axis_label_visible: true,
                    title: "TP".to_string(),
                }));
            }
        }
    }

    /// Show the dashed in-progress guide for a two-point tool.
    pub fn show_preview(&mut self, price: f64, color: &str) {
        self.clear_preview();
        if let Some(surface) = self.surface.as_mut() {
            self.preview_line = Some(surface.create_price_line(PriceLine {
                price,
                color: color.to_string(),
                line_width: 1,
                line_style: LineStyle::Dashed,
                axis_label_visible: false,
                title: "Drawing...".to_string(),
            }));
        }
    }

    pub fn clear_preview(&mut self) {
        if let (Some(surface), Some(id)) = (self.surface.as_mut(), self.preview_line.take()) {
            surface.remove_price_line(id);
        }
    }
}

/// Resolve a surface click into chart coordinates.
///
/// Price comes preferentially from the hovered series value, falling back to
/// the surface's y-to-price mapping; the click is dropped when neither is
/// available. Time falls back to `now` for clicks past the last bar.
pub fn resolve_click<S: ChartSurface>(click: &ClickEvent, surface: &S, now: i64) -> Option<ChartPoint> {
    let price = click
        .series_price
        .or_else(|| click.y.and_then(|y| surface.price_at_y(y)))?;
    let time = click.time.unwrap_or(now);
    Some(ChartPoint { time, price })
}
