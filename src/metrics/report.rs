use super::{Counter, RequestResult, StatWindow, WindowTick};

/// Tick of the per-second window.
pub const SECOND_TICK_SECS: u64 = 1;
/// Tick of the half-minute window.
pub const HALF_TICK_SECS: u64 = 30;

/// The three windows every result is posted to, plus the sent counter.
#[derive(Debug)]
pub struct Report {
    second: StatWindow,
    half: StatWindow,
    total: StatWindow,
    sent: Counter,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self {
            second: StatWindow::new(WindowTick::Seconds(SECOND_TICK_SECS)),
            half: StatWindow::new(WindowTick::Seconds(HALF_TICK_SECS)),
            total: StatWindow::new(WindowTick::Unbounded),
            sent: Counter::new(),
        }
    }

    pub fn record(&self, result: &RequestResult) {
        self.second.update(result);
        self.half.update(result);
        self.total.update(result);
    }

    #[must_use]
    pub const fn second(&self) -> &StatWindow {
        &self.second
    }

    #[must_use]
    pub const fn half(&self) -> &StatWindow {
        &self.half
    }

    #[must_use]
    pub const fn total(&self) -> &StatWindow {
        &self.total
    }

    #[must_use]
    pub const fn sent(&self) -> &Counter {
        &self.sent
    }
}
