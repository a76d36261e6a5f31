//! Resampling of base-resolution candles into coarser timeframes.

use std::sync::Arc;

use crate::candle::Candle;
use crate::timeframe::Timeframe;

/// Aggregate base-resolution candles into the target timeframe.
///
/// Buckets are aligned to fixed boundaries: a candle at time `t` belongs to
/// the bucket starting at `floor(t / interval) * interval`. Within a bucket,
/// open is the first bar's open, close the last bar's close, high/low the
/// extrema, and volume the sum. A partial trailing bucket is emitted with
/// whatever bars have been observed so far.
///
/// Pure function of its inputs; the base timeframe passes through unchanged.
pub fn resample_candles(candles: &[Candle], timeframe: Timeframe) -> Vec<Candle> {
    if timeframe == Timeframe::BASE || candles.is_empty() {
        return candles.to_vec();
    }

    let interval = timeframe.seconds();
    let mut resampled = Vec::new();
    let mut current: Option<Candle> = None;

    for candle in candles {
        let bucket_start = candle.time.div_euclid(interval) * interval;

        if let Some(agg) = current.as_mut() {
            if agg.time == bucket_start {
                // Same bucket - update high, low, close, accumulate volume
                agg.high = agg.high.max(candle.high);
                agg.low = agg.low.min(candle.low);
                agg.close = candle.close;
                agg.volume += candle.volume;
            } else {
                // New bucket - save current and start new
                resampled.push(*agg);
                *agg = Candle::new(
                    bucket_start,
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close,
                    candle.volume,
                );
            }
        } else {
            current = Some(Candle::new(
                bucket_start,
                candle.open,
                candle.high,
                candle.low,
                candle.close,
                candle.volume,
            ));
        }
    }

    // Don't forget the trailing bucket
    if let Some(agg) = current {
        resampled.push(agg);
    }

    resampled
}

/// Memoizing wrapper around [`resample_candles`].
///
/// Caches the last (series, timeframe) pair by `Arc` identity so redraws that
/// did not change the base data or the target resolution reuse the previous
/// result instead of re-aggregating.
#[derive(Debug, Default)]
pub struct Resampler {
    cached: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    input: Arc<Vec<Candle>>,
    timeframe: Timeframe,
    output: Arc<Vec<Candle>>,
}

impl Resampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample `candles` to `timeframe`, reusing the cached result when both
    /// the series (by pointer identity) and the timeframe are unchanged.
    pub fn resample(&mut self, candles: &Arc<Vec<Candle>>, timeframe: Timeframe) -> Arc<Vec<Candle>> {
        if let Some(entry) = &self.cached {
            if entry.timeframe == timeframe && Arc::ptr_eq(&entry.input, candles) {
                return Arc::clone(&entry.output);
            }
        }

        let output = Arc::new(resample_candles(candles, timeframe));
        self.cached = Some(CacheEntry {
            input: Arc::clone(candles),
            timeframe,
            output: Arc::clone(&output),
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(time, open, high, low, close, volume)
    }

    /// A run of consecutive M5 candles starting at `start`.
    fn m5_run(start: i64, count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(
                    start + i as i64 * 300,
                    base,
                    base + 2.0,
                    base - 2.0,
                    base + 1.0,
                    10.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_twelve_m5_into_one_h1() {
        // 12 consecutive M5 candles with no gaps fold into one H1 candle
        let candles = m5_run(3600, 12);
        let resampled = resample_candles(&candles, Timeframe::Hour1);

        assert_eq!(resampled.len(), 1);
        let agg = resampled[0];
        assert_eq!(agg.time, 3600);
        assert_eq!(agg.open, candles[0].open);
        assert_eq!(agg.close, candles[11].close);
        let max_high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let min_low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        assert_eq!(agg.high, max_high);
        assert_eq!(agg.low, min_low);
        assert_eq!(agg.volume, 120.0);
    }

    #[test]
    fn test_partial_trailing_bucket() {
        // 15 M5 candles: one full H1 bucket plus a partial one of 3 bars
        let candles = m5_run(3600, 15);
        let resampled = resample_candles(&candles, Timeframe::Hour1);

        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled[1].time, 7200);
        assert_eq!(resampled[1].open, candles[12].open);
        assert_eq!(resampled[1].close, candles[14].close);
        assert_eq!(resampled[1].volume, 30.0);
    }

    #[test]
    fn test_base_timeframe_passthrough() {
        let candles = m5_run(0, 7);
        let resampled = resample_candles(&candles, Timeframe::Min5);
        assert_eq!(resampled, candles);
    }

    #[test]
    fn test_idempotent_on_bucket_aligned_input() {
        // An H1-aligned series resampled at H1 is unchanged
        let hourly: Vec<Candle> = (0..6)
            .map(|i| candle(i * 3600, 100.0, 110.0, 90.0, 105.0, 50.0))
            .collect();
        let resampled = resample_candles(&hourly, Timeframe::Hour1);
        assert_eq!(resampled, hourly);
    }

    #[test]
    fn test_associative_through_intermediate_timeframe() {
        // base -> M15 -> H1 equals base -> H1 on bucket-aligned ranges
        let candles = m5_run(0, 48);
        let via_m15 = resample_candles(&resample_candles(&candles, Timeframe::Min15), Timeframe::Hour1);
        let direct = resample_candles(&candles, Timeframe::Hour1);
        assert_eq!(via_m15, direct);
    }

    #[test]
    fn test_bucket_alignment_with_offset_start() {
        // First candle sits mid-bucket; the bucket key still floor-aligns
        let candles = vec![
            candle(3900, 100.0, 101.0, 99.0, 100.5, 1.0),
            candle(4200, 100.5, 102.0, 100.0, 101.0, 2.0),
        ];
        let resampled = resample_candles(&candles, Timeframe::Hour1);
        assert_eq!(resampled.len(), 1);
        assert_eq!(resampled[0].time, 3600);
    }

    #[test]
    fn test_gap_between_buckets() {
        let candles = vec![
            candle(0, 100.0, 101.0, 99.0, 100.5, 1.0),
            // next bar three hours later
            candle(10800, 100.5, 102.0, 100.0, 101.0, 2.0),
        ];
        let resampled = resample_candles(&candles, Timeframe::Hour1);
        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled[0].time, 0);
        assert_eq!(resampled[1].time, 10800);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_candles(&[], Timeframe::Hour1).is_empty());
    }

    #[test]
    fn test_resampler_caches_by_identity() {
        let series = Arc::new(m5_run(0, 24));
        let mut resampler = Resampler::new();

        let first = resampler.resample(&series, Timeframe::Hour1);
        let second = resampler.resample(&series, Timeframe::Hour1);
        assert!(Arc::ptr_eq(&first, &second));

        // Changing the timeframe misses the cache
        let m15 = resampler.resample(&series, Timeframe::Min15);
        assert!(!Arc::ptr_eq(&first, &m15));

        // A new series allocation misses the cache even with equal contents
        let clone = Arc::new(series.as_ref().clone());
        let third = resampler.resample(&clone, Timeframe::Min15);
        assert!(!Arc::ptr_eq(&m15, &third));
        assert_eq!(*m15, *third);
    }
}
