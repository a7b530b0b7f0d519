use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::metrics::{HALF_TICK_SECS, Report, SECOND_TICK_SECS, StatWindow};
use crate::shutdown::ShutdownReceiver;

use super::table::{column_header, compute_row, format_row, row_label};

/// Spawns the live table printer. Prints the header immediately, then one
/// row per second for the second window and one highlighted row every
/// thirty seconds for the half window, each followed by clearing the window.
/// Exits on the shutdown signal.
pub(crate) fn setup_progress_reporter(
    report: Arc<Report>,
    mut shutdown_rx: ShutdownReceiver,
    no_color: bool,
) -> tokio::task::JoinHandle<()> {
    let highlight = !no_color && std::io::stdout().is_terminal();

    tokio::spawn(async move {
        print_line(&column_header(), None);

        let second_period = Duration::from_secs(SECOND_TICK_SECS);
        let half_period = Duration::from_secs(HALF_TICK_SECS);
        let start = Instant::now();
        let mut second_ticker = tokio::time::interval_at(
            start.checked_add(second_period).unwrap_or(start),
            second_period,
        );
        second_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut half_ticker = tokio::time::interval_at(
            start.checked_add(half_period).unwrap_or(start),
            half_period,
        );
        half_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!("Reporter received shutdown");
                    break;
                }
                _ = second_ticker.tick() => {
                    print_line(&render_row(report.second()), None);
                }
                _ = half_ticker.tick() => {
                    let color = highlight.then_some(Color::Blue);
                    print_line(&render_row(report.half()), color);
                    print_line(&column_header(), None);
                }
            }
        }
    })
}

/// Takes (snapshot and resets) the window and formats its row.
pub(crate) fn render_row(window: &StatWindow) -> String {
    let mut snapshot = window.take();
    let stats = compute_row(&mut snapshot);
    let label = row_label(snapshot.tick, &chrono::Local::now());
    format_row(&label, &stats)
}

fn print_line(line: &str, color: Option<Color>) {
    let mut out = std::io::stdout();
    if write_line(&mut out, line, color).is_err() {
        debug!("Failed to write report row");
    }
}

fn write_line(out: &mut impl Write, line: &str, color: Option<Color>) -> std::io::Result<()> {
    if let Some(color) = color {
        queue!(out, SetForegroundColor(color))?;
    }
    queue!(out, Print(line))?;
    if color.is_some() {
        queue!(out, ResetColor)?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}
