//! Timeframe types and fetch-window sizing.

/// Upper bound on how many base-resolution candles a single fetch may request.
pub const MAX_CANDLE_FETCH: usize = 2000;

/// Timeframe enumeration for the chart resolutions the dashboard offers.
///
/// `Min5` is the base resolution: every other timeframe is derived from it
/// by resampling, never fetched directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Min5, // 5 minutes (base data)
    Min15,
    Min30,
    Hour1,
    Hour4,
}

impl Timeframe {
    /// The base resolution all candle fetches use.
    pub const BASE: Timeframe = Timeframe::Min5;

    /// Returns the duration of this timeframe in seconds.
    pub fn seconds(&self) -> i64 {
        self.minutes() as i64 * 60
    }

    /// Returns the duration of this timeframe in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::Min5 => 5,
            Timeframe::Min15 => 15,
            Timeframe::Min30 => 30,
            Timeframe::Hour1 => 60,
            Timeframe::Hour4 => 240,
        }
    }

    /// Returns the wire label for this timeframe.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Min5 => "M5",
            Timeframe::Min15 => "M15",
            Timeframe::Min30 => "M30",
            Timeframe::Hour1 => "H1",
            Timeframe::Hour4 => "H4",
        }
    }

    /// Parse a wire label back into a timeframe.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tf| tf.label() == label)
    }

    /// Returns all available timeframes in order.
    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Min5,
            Timeframe::Min15,
            Timeframe::Min30,
            Timeframe::Hour1,
            Timeframe::Hour4,
        ]
    }

    /// Number of base-resolution candles needed to build `count` candles of
    /// this timeframe, capped at [`MAX_CANDLE_FETCH`].
    pub fn base_candles_needed(&self, count: usize) -> usize {
        let per_candle = (self.seconds() / Timeframe::BASE.seconds()) as usize;
        (count * per_candle).min(MAX_CANDLE_FETCH)
    }
}
