use chrono::{DateTime, Local};

use crate::metrics::{WindowSnapshot, WindowTick};

const HALF_WINDOW_LABEL: &str = "[ 30Sec ]";

/// Derived metrics for one live table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowStats {
    pub(crate) rps: f64,
    /// Mean latency in seconds.
    pub(crate) average: f64,
    pub(crate) error_count: u64,
    pub(crate) fastest_ms: f64,
    pub(crate) slowest_ms: f64,
    pub(crate) avg_size: u64,
}

/// Sorts the snapshot's latencies and derives the row metrics. Every derived
/// value is zero when the window saw no successful request.
#[expect(
    clippy::float_arithmetic,
    reason = "Row rates and latencies are floating-point seconds"
)]
pub(crate) fn compute_row(snapshot: &mut WindowSnapshot) -> RowStats {
    snapshot.sort_latencies();
    let count = snapshot.success_count();
    let (Some(fastest), Some(slowest)) = (snapshot.lats.first(), snapshot.lats.last()) else {
        return RowStats {
            rps: 0.0,
            average: 0.0,
            error_count: snapshot.error_count,
            fastest_ms: 0.0,
            slowest_ms: 0.0,
            avg_size: 0,
        };
    };

    let count_f = count as f64;
    let tick_secs = snapshot.tick.seconds().unwrap_or(1).max(1) as f64;
    RowStats {
        rps: count_f / tick_secs,
        average: snapshot.latency_sum / count_f,
        error_count: snapshot.error_count,
        fastest_ms: fastest * 1000.0,
        slowest_ms: slowest * 1000.0,
        avg_size: snapshot.size_sum.checked_div(count).unwrap_or(0),
    }
}

pub(crate) fn row_label(tick: WindowTick, now: &DateTime<Local>) -> String {
    match tick {
        WindowTick::Seconds(1) | WindowTick::Unbounded => now.format("%H:%M:%S").to_string(),
        WindowTick::Seconds(_) => HALF_WINDOW_LABEL.to_owned(),
    }
}

pub(crate) fn column_header() -> String {
    format!(
        "{:>10} {:>10} {:>10} {:>8} {:>12} {:>12} {:>10}",
        "Time", "Req/s", "Avg(ms)", "Fails", "Fastest(ms)", "Slowest(ms)", "Avg.Size"
    )
}

#[expect(clippy::float_arithmetic, reason = "Seconds to milliseconds")]
pub(crate) fn format_row(label: &str, stats: &RowStats) -> String {
    format!(
        "{:>10} {:>10.1} {:>10.2} {:>8} {:>12.2} {:>12.2} {:>10}",
        label,
        stats.rps,
        stats.average * 1000.0,
        stats.error_count,
        stats.fastest_ms,
        stats.slowest_ms,
        stats.avg_size
    )
}
