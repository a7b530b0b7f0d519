use std::cmp::Reverse;

use super::RunOverview;
use super::histogram::{build_histogram, histogram_lines};
use super::percentiles::percentile_lines;
use crate::metrics::WindowSnapshot;

/// Renders the final report. Sorts the snapshot's latencies in place.
pub(crate) fn summary_lines(snapshot: &mut WindowSnapshot, overview: &RunOverview) -> Vec<String> {
    snapshot.sort_latencies();
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push("Summary:".to_owned());
    lines.extend(overview_lines(snapshot, overview));

    lines.push(String::new());
    lines.push("Status code distribution:".to_owned());
    lines.extend(status_lines(snapshot));

    lines.push(String::new());
    lines.push("Response time histogram (ms):".to_owned());
    lines.extend(histogram_lines(&build_histogram(&snapshot.lats)));

    lines.push(String::new());
    lines.push("Latency distribution:".to_owned());
    lines.extend(percentile_lines(&snapshot.lats));

    if snapshot.error_count > 0 {
        lines.push(String::new());
        lines.push("Error distribution:".to_owned());
        lines.extend(error_lines(snapshot));
    }
    lines
}

#[expect(clippy::float_arithmetic, reason = "Requests per second over elapsed time")]
fn overview_lines(snapshot: &WindowSnapshot, overview: &RunOverview) -> Vec<String> {
    let responses = snapshot.success_count();
    let elapsed_secs = overview.elapsed.as_secs_f64();
    let observed = snapshot.observed();
    let rps = if elapsed_secs > 0.0 {
        observed as f64 / elapsed_secs
    } else {
        0.0
    };
    let per_response = snapshot.size_sum.checked_div(responses).unwrap_or(0);

    vec![
        format!("  Dispatched:\t{}", overview.dispatched),
        format!("  Sent:\t\t{}", overview.sent),
        format!("  Responses:\t{}", responses),
        format!("  Failures:\t{}", snapshot.error_count),
        format!("  Total:\t{:.4} secs", elapsed_secs),
        format!("  Requests/sec:\t{:.4}", rps),
        format!("  Total data:\t{} bytes", snapshot.size_sum),
        format!("  Size/request:\t{} bytes", per_response),
    ]
}

fn status_lines(snapshot: &WindowSnapshot) -> Vec<String> {
    let mut codes: Vec<(u16, u64)> = snapshot
        .status_dist
        .iter()
        .map(|(code, count)| (*code, *count))
        .collect();
    codes.sort_unstable_by_key(|(code, _)| *code);
    codes
        .into_iter()
        .map(|(code, count)| format!("  [{}]\t{} responses", code, count))
        .collect()
}

fn error_lines(snapshot: &WindowSnapshot) -> Vec<String> {
    let mut errors: Vec<(&String, u64)> = snapshot
        .error_dist
        .iter()
        .map(|(text, count)| (text, *count))
        .collect();
    errors.sort_by(|left, right| {
        Reverse(left.1)
            .cmp(&Reverse(right.1))
            .then_with(|| left.0.cmp(right.0))
    });
    errors
        .into_iter()
        .map(|(text, count)| format!("  [{}]\t{}", count, text))
        .collect()
}
