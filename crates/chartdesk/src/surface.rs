//! Abstraction over the external chart rendering surface.
//!
//! The rendering engine is an externally-owned resource: it takes a
//! candlestick series, exposes horizontal price-line primitives, and reports
//! pointer clicks. Everything the engine draws - annotations, previews,
//! signal overlays - is built out of price lines.

use chartdesk_core::{Candle, LineStyle};

/// Creation options for a surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub width: u32,
    pub height: u32,
}

/// Handle to one price line on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceLineId(pub(crate) u64);

/// A horizontal price-line primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    pub price: f64,
    pub color: String,
    pub line_width: u32,
    pub line_style: LineStyle,
    pub axis_label_visible: bool,
    pub title: String,
}

/// A pointer click reported by the surface.
///
/// `time` is absent when the click lands past the last bar; `series_price`
/// is the hovered series value at the click's time coordinate, when the
/// surface can resolve one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickEvent {
    pub time: Option<i64>,
    pub series_price: Option<f64>,
    pub y: Option<f64>,
}

/// One mounted instance of the external rendering surface.
pub trait ChartSurface {
    /// Replace the candlestick series.
    fn set_candles(&mut self, candles: &[Candle]);

    /// Fit the visible range to the loaded series.
    fn fit_content(&mut self);

    fn create_price_line(&mut self, line: PriceLine) -> PriceLineId;

    fn remove_price_line(&mut self, id: PriceLineId);

    /// Convert a pixel y-coordinate to a price, if the surface has a scale.
    fn price_at_y(&self, y: f64) -> Option<f64>;

    /// Re-apply the container width after a window resize.
    fn set_width(&mut self, width: u32);
}

/// Factory for surface instances; the adapter acquires a fresh surface per
/// data lifecycle and never shares one across symbols or timeframes.
pub trait SurfaceFactory {
    type Surface: ChartSurface;

    fn create(&self, options: &SurfaceOptions) -> Self::Surface;
}

/// In-memory surface that records what it was asked to draw.
///
/// Serves as the headless backend for the demo binary and as the observable
/// double in tests.
#[derive(Debug)]
pub struct RecordingSurface {
    candles: Vec<Candle>,
    lines: Vec<(PriceLineId, PriceLine)>,
    next_line_id: u64,
    width: u32,
    height: u32,
    fitted: bool,
}

impl RecordingSurface {
    pub fn new(options: &SurfaceOptions) -> Self {
        Self {
            candles: Vec::new(),
            lines: Vec::new(),
            next_line_id: 1,
            width: options.width,
            height: options.height,
            fitted: false,
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn lines(&self) -> impl Iterator<Item = &PriceLine> {
        self.lines.iter().map(|(_, line)| line)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn was_fitted(&self) -> bool {
        self.fitted
    }

    fn price_bounds(&self) -> Option<(f64, f64)> {
        let first = self.candles.first()?;
        let mut low = first.low;
        let mut high = first.high;
        for candle in &self.candles {
            low = low.min(candle.low);
            high = high.max(candle.high);
        }
        Some((low, high))
    }
}

impl ChartSurface for RecordingSurface {
    fn set_candles(&mut self, candles: &[Candle]) {
        self.candles = candles.to_vec();
    }

    fn fit_content(&mut self) {
        self.fitted = true;
    }

    fn create_price_line(&mut self, line: PriceLine) -> PriceLineId {
        let id = PriceLineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.push((id, line));
        id
    }

    fn remove_price_line(&mut self, id: PriceLineId) {
        self.lines.retain(|(line_id, _)| *line_id != id);
    }

    fn price_at_y(&self, y: f64) -> Option<f64> {
        let (low, high) = self.price_bounds()?;
        if self.height == 0 {
            return None;
        }
        // Linear scale: top of the surface is the series high
        let fraction = (y / self.height as f64).clamp(0.0, 1.0);
        Some(high - fraction * (high - low))
    }

    fn set_width(&mut self, width: u32) {
        self.width = width;
    }
}

/// Factory producing [`RecordingSurface`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingFactory;

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn create(&self, options: &SurfaceOptions) -> RecordingSurface {
        RecordingSurface::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RecordingSurface {
        let mut surface = RecordingSurface::new(&SurfaceOptions {
            width: 800,
            height: 100,
        });
        surface.set_candles(&[
            Candle::new(0, 100.0, 200.0, 100.0, 150.0, 1.0),
            Candle::new(300, 150.0, 200.0, 100.0, 180.0, 1.0),
        ]);
        surface
    }

    #[test]
    fn test_price_at_y_maps_linearly() {
        let surface = surface();
        assert_eq!(surface.price_at_y(0.0), Some(200.0));
        assert_eq!(surface.price_at_y(100.0), Some(100.0));
        assert_eq!(surface.price_at_y(50.0), Some(150.0));
    }

    #[test]
    fn test_price_at_y_without_data() {
        let surface = RecordingSurface::new(&SurfaceOptions {
            width: 800,
            height: 100,
        });
        assert_eq!(surface.price_at_y(10.0), None);
    }

    #[test]
    fn test_line_add_remove() {
        let mut surface = surface();
        let id = surface.create_price_line(PriceLine {
            price: 123.0,
            color: "#ffffff".to_string(),
            line_width: 1,
            line_style: LineStyle::Solid,
            axis_label_visible: true,
            title: String::new(),
        });
        assert_eq!(surface.line_count(), 1);
        surface.remove_price_line(id);
        assert_eq!(surface.line_count(), 0);
    }
}
