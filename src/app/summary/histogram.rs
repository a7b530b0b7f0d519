/// Width of the longest histogram bar, in marks.
pub(crate) const BAR_WIDTH: u64 = 40;
const BAR_CHAR: &str = "∎";

/// Fixed bounds in seconds; a final bucket bounded by the slowest latency
/// is appended at build time.
const FAST_BOUNDS: [f64; 2] = [0.01, 0.05];
/// Tenths of a second used for the 300ms..1200ms bounds.
const TENTH_BOUNDS: std::ops::RangeInclusive<u32> = 3..=12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HistogramBucket {
    pub(crate) bound_secs: f64,
    pub(crate) count: u64,
}

#[expect(clippy::float_arithmetic, reason = "Bounds are tenths of a second")]
pub(crate) fn bucket_bounds(slowest: f64) -> Vec<f64> {
    let mut bounds = FAST_BOUNDS.to_vec();
    bounds.extend(TENTH_BOUNDS.map(|tenths| f64::from(tenths) / 10.0));
    bounds.push(slowest);
    bounds
}

/// Buckets ascending-sorted latencies. Each latency lands in the first
/// bucket, scanning left to right, whose bound it does not exceed; anything
/// past every bound lands in the last bucket. Returns no buckets when there
/// is no data.
pub(crate) fn build_histogram(sorted_lats: &[f64]) -> Vec<HistogramBucket> {
    let Some(slowest) = sorted_lats.last() else {
        return Vec::new();
    };
    let bounds = bucket_bounds(*slowest);
    let last = bounds.len().saturating_sub(1);
    let mut counts = vec![0u64; bounds.len()];

    let mut bucket = 0usize;
    for lat in sorted_lats {
        while bucket < last && bounds.get(bucket).is_some_and(|bound| lat > bound) {
            bucket = bucket.saturating_add(1);
        }
        if let Some(count) = counts.get_mut(bucket) {
            *count = count.saturating_add(1);
        }
    }

    bounds
        .into_iter()
        .zip(counts)
        .map(|(bound_secs, count)| HistogramBucket { bound_secs, count })
        .collect()
}

pub(crate) fn bar_len(count: u64, max_count: u64) -> usize {
    let len = count
        .saturating_mul(BAR_WIDTH)
        .checked_div(max_count)
        .unwrap_or(0);
    usize::try_from(len).unwrap_or(0)
}

#[expect(clippy::float_arithmetic, reason = "Seconds to milliseconds")]
pub(crate) fn histogram_lines(buckets: &[HistogramBucket]) -> Vec<String> {
    if buckets.is_empty() {
        return vec!["  no data".to_owned()];
    }
    let max_count = buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0);
    buckets
        .iter()
        .map(|bucket| {
            format!(
                "  {:>10.3} [{:>10}]\t|{}",
                bucket.bound_secs * 1000.0,
                bucket.count,
                BAR_CHAR.repeat(bar_len(bucket.count, max_count))
            )
        })
        .collect()
}
