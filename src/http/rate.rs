use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fixed-period gate spacing submissions `1/rate` seconds apart.
#[derive(Debug)]
pub(crate) struct Throttle {
    ticker: Interval,
}

impl Throttle {
    /// `None` when `rate` is zero (unthrottled).
    pub(crate) fn new(rate: u64) -> Option<Self> {
        let period = throttle_period(rate)?;
        let now = Instant::now();
        let mut ticker = interval_at(now.checked_add(period).unwrap_or(now), period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Some(Self { ticker })
    }

    pub(crate) async fn wait(&mut self) {
        self.ticker.tick().await;
    }
}

pub(crate) fn throttle_period(rate: u64) -> Option<Duration> {
    let micros = 1_000_000u64.checked_div(rate)?;
    Some(Duration::from_micros(micros.max(1)))
}
