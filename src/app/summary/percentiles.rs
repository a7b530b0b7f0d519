pub(crate) const PERCENTILES: [u64; 7] = [10, 25, 50, 75, 90, 95, 99];

/// Index of the first ascending position `i` with `i * 100 / len >= pct`.
pub(crate) fn percentile_index(len: usize, pct: u64) -> Option<usize> {
    let len_u64 = u64::try_from(len).ok()?;
    (0..len).find(|idx| {
        u64::try_from(*idx)
            .unwrap_or(u64::MAX)
            .saturating_mul(100)
            .checked_div(len_u64)
            .is_some_and(|current| current >= pct)
    })
}

/// Percentile values from ascending-sorted latencies (seconds). Percentiles
/// no index reaches are reported as `None`.
pub(crate) fn percentile_values(sorted_lats: &[f64]) -> Vec<(u64, Option<f64>)> {
    PERCENTILES
        .iter()
        .map(|pct| {
            let value = percentile_index(sorted_lats.len(), *pct)
                .and_then(|idx| sorted_lats.get(idx).copied());
            (*pct, value)
        })
        .collect()
}

pub(crate) fn percentile_lines(sorted_lats: &[f64]) -> Vec<String> {
    percentile_values(sorted_lats)
        .into_iter()
        .filter_map(|(pct, value)| {
            value
                .filter(|secs| *secs > 0.0)
                .map(|secs| format!("  {}% in {:.4} secs", pct, secs))
        })
        .collect()
}
