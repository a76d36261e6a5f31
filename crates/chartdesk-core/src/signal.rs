//! Trading-signal feed records and entry overlays.

use serde::Deserialize;

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Normalize the feed's loose direction strings. `BUY`, `bullish` and
    /// `long` map to buy; everything else is treated as sell.
    pub fn from_loose(raw: Option<&str>) -> Direction {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("buy")
                || s.eq_ignore_ascii_case("bullish")
                || s.eq_ignore_ascii_case("long") =>
            {
                Direction::Buy
            }
            _ => Direction::Sell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

/// Signal outcome as reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Pending,
}

impl Outcome {
    pub fn parse(raw: &str) -> Option<Outcome> {
        match raw {
            "win" => Some(Outcome::Win),
            "loss" => Some(Outcome::Loss),
            "pending" => Some(Outcome::Pending),
            _ => None,
        }
    }
}

/// Raw signal record from the signals feed.
///
/// The feed is loosely typed: direction arrives as a free-form string and
/// price levels may be null for signals without a trade setup.
#[derive(Debug, Clone, Deserialize)]
pub struct Signal {
    pub signal_id: String,
    pub symbol: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub entry: Option<f64>,
    #[serde(default)]
    pub sl: Option<f64>,
    #[serde(default)]
    pub tp: Option<f64>,
    #[serde(default)]
    pub rr: Option<f64>,
    #[serde(default)]
    pub outcome: Option<String>,
    pub created_at: i64,
}

/// Overlay-ready signal: resolved direction, mandatory entry price.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub id: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry: f64,
    pub sl: Option<f64>,
    pub tp: Option<f64>,
    pub rr: Option<f64>,
    pub outcome: Option<Outcome>,
    pub created_at: i64,
}

impl EntrySignal {
    /// Map raw feed signals onto entry overlays for one symbol.
    ///
    /// Keeps only signals carrying an entry price for the given symbol
    /// (case-insensitive) and caps the result at `limit`, preserving the
    /// feed's newest-first order.
    pub fn from_signals(signals: &[Signal], symbol: &str, limit: usize) -> Vec<EntrySignal> {
        signals
            .iter()
            .filter(|s| s.entry.is_some() && s.symbol.eq_ignore_ascii_case(symbol))
            .take(limit)
            .map(|s| EntrySignal {
                id: s.signal_id.clone(),
                symbol: s.symbol.clone(),
                direction: Direction::from_loose(s.direction.as_deref()),
                entry: s.entry.unwrap_or_default(),
                sl: s.sl,
                tp: s.tp,
                rr: s.rr,
                outcome: s.outcome.as_deref().and_then(Outcome::parse),
                created_at: s.created_at,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(id: &str, symbol: &str, direction: &str, entry: Option<f64>) -> Signal {
        Signal {
            signal_id: id.to_string(),
            symbol: symbol.to_string(),
            direction: Some(direction.to_string()),
            entry,
            sl: None,
            tp: None,
            rr: None,
            outcome: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_direction_normalization() {
        assert_eq!(Direction::from_loose(Some("BUY")), Direction::Buy);
        assert_eq!(Direction::from_loose(Some("bullish")), Direction::Buy);
        assert_eq!(Direction::from_loose(Some("long")), Direction::Buy);
        assert_eq!(Direction::from_loose(Some("SELL")), Direction::Sell);
        assert_eq!(Direction::from_loose(Some("bearish")), Direction::Sell);
        assert_eq!(Direction::from_loose(None), Direction::Sell);
    }

    #[test]
    fn test_from_signals_filters_and_caps() {
        let signals = vec![
            signal("s1", "XAUUSD", "BUY", Some(2000.0)),
            signal("s2", "EURUSD", "BUY", Some(1.1)),
            signal("s3", "xauusd", "SELL", Some(1990.0)),
            signal("s4", "XAUUSD", "BUY", None),
            signal("s5", "XAUUSD", "long", Some(1985.0)),
        ];

        let entries = EntrySignal::from_signals(&signals, "XAUUSD", 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "s1");
        // case-insensitive symbol match, no-entry signal skipped
        assert_eq!(entries[1].id, "s3");
        assert_eq!(entries[1].direction, Direction::Sell);
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!(Outcome::parse("win"), Some(Outcome::Win));
        assert_eq!(Outcome::parse("loss"), Some(Outcome::Loss));
        assert_eq!(Outcome::parse("pending"), Some(Outcome::Pending));
        assert_eq!(Outcome::parse("unknown"), None);
    }
}
