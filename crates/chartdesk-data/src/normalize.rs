//! Normalization of loosely-typed candle payloads.
//!
//! Upstream feeds disagree on key names (`time` vs `ts` vs `timestamp`,
//! `open` vs `o`, ...) and on value types (numbers vs numeric strings vs ISO
//! dates). Everything is coerced into canonical [`Candle`] records here;
//! anything malformed or physically impossible is dropped silently so a bad
//! bar degrades the dataset instead of aborting the chart.

use chartdesk_core::Candle;
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

/// Maximum close-to-close deviation before a candle is treated as a bad tick.
pub const MAX_CLOSE_JUMP: f64 = 0.30;

/// Normalize a raw candle payload into a clean, time-ordered sequence.
///
/// Guarantees of the output:
/// - strictly increasing timestamps (duplicates keep the first occurrence)
/// - every candle satisfies `low <= min(open, close) <= max(open, close) <= high`
/// - all prices positive and finite
/// - no close deviates more than [`MAX_CLOSE_JUMP`] from the previously
///   accepted close
///
/// The result may be shorter than the input; an empty result means the feed
/// had no usable data, not that an error occurred.
pub fn normalize_candles(raw: &[Value]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = raw.iter().filter_map(candle_from_value).collect();

    candles.sort_by_key(|c| c.time);
    candles.dedup_by_key(|c| c.time);

    filter_price_jumps(candles)
}

/// Coerce one payload item into a candle, or drop it.
fn candle_from_value(value: &Value) -> Option<Candle> {
    let obj = value.as_object()?;

    let time = resolve_time(obj)?;
    let open = resolve_price(obj, "open", "o")?;
    let high = resolve_price(obj, "high", "h")?;
    let low = resolve_price(obj, "low", "l")?;
    let close = resolve_price(obj, "close", "c")?;
    let volume = resolve_volume(obj);

    let candle = Candle::new(time, open, high, low, close, volume);
    if !candle.is_consistent() {
        log::debug!("dropping inconsistent candle at {time}");
        return None;
    }

    Some(candle)
}

/// Resolve a unix-seconds timestamp from `time`, `ts` or `timestamp`.
///
/// `time` and `ts` must be numeric seconds; `timestamp` additionally accepts
/// an ISO-8601 date string.
fn resolve_time(obj: &Map<String, Value>) -> Option<i64> {
    if let Some(t) = obj.get("time").and_then(Value::as_f64) {
        return Some(t as i64);
    }
    if let Some(t) = obj.get("ts").and_then(Value::as_f64) {
        return Some(t as i64);
    }

    match obj.get("timestamp") {
        Some(Value::Number(n)) => n.as_f64().map(|t| t as i64),
        Some(Value::String(s)) => parse_datetime(s),
        _ => None,
    }
}

/// Parse an ISO-8601 / RFC 3339 date string into unix seconds.
fn parse_datetime(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    // Fall back to a bare "YYYY-MM-DD HH:MM:SS", treated as UTC
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Resolve a price field via its full or abbreviated key.
///
/// The abbreviated key is only consulted when the full key is absent, null,
/// zero or an empty string; a present-but-garbage full value fails the
/// candle rather than silently switching keys.
fn resolve_price(obj: &Map<String, Value>, primary: &str, short: &str) -> Option<f64> {
    let raw = obj
        .get(primary)
        .filter(|v| is_present(v))
        .or_else(|| obj.get(short).filter(|v| is_present(v)))?;
    field_number(raw)
}

/// Resolve volume via `volume` or `v`, defaulting to zero.
fn resolve_volume(obj: &Map<String, Value>) -> f64 {
    obj.get("volume")
        .filter(|v| is_present(v))
        .or_else(|| obj.get("v").filter(|v| is_present(v)))
        .and_then(field_number)
        .unwrap_or(0.0)
}

/// Whether a JSON value counts as a provided field (non-null, non-zero,
/// non-empty).
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Coerce a JSON number or numeric string into a finite f64.
fn field_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

/// Drop candles whose close jumps more than [`MAX_CLOSE_JUMP`] from the last
/// accepted close.
///
/// The reference never advances to a rejected candle, so a burst of bad
/// ticks cannot drag the baseline with it.
fn filter_price_jumps(candles: Vec<Candle>) -> Vec<Candle> {
    let mut validated: Vec<Candle> = Vec::with_capacity(candles.len());

    for candle in candles {
        if let Some(prev) = validated.last() {
            let deviation = (candle.close - prev.close).abs() / prev.close;
            if deviation > MAX_CLOSE_JUMP {
                log::warn!(
                    "skipping candle at {} with abnormal close jump: {} -> {}",
                    candle.time,
                    prev.close,
                    candle.close
                );
                continue;
            }
        }
        validated.push(candle);
    }

    validated
}
