pub(crate) mod histogram;
mod lines;
pub(crate) mod percentiles;

use std::time::Duration;

use crate::metrics::WindowSnapshot;

pub(crate) use lines::summary_lines;

/// Run-wide figures gathered outside the total window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunOverview {
    pub(crate) sent: u64,
    pub(crate) dispatched: u64,
    pub(crate) elapsed: Duration,
}

pub(crate) fn print_summary(snapshot: &mut WindowSnapshot, overview: &RunOverview) {
    for line in summary_lines(snapshot, overview) {
        println!("{}", line);
    }
}
