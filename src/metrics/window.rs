use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Counter, RequestResult};

/// Nominal length of a statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTick {
    Seconds(u64),
    Unbounded,
}

impl WindowTick {
    #[must_use]
    pub const fn seconds(self) -> Option<u64> {
        match self {
            WindowTick::Seconds(secs) => Some(secs),
            WindowTick::Unbounded => None,
        }
    }
}

#[derive(Debug, Default)]
struct WindowData {
    lats: Vec<f64>,
    error_dist: HashMap<String, u64>,
    status_dist: HashMap<u16, u64>,
    latency_sum: f64,
    size_sum: u64,
}

/// Aggregate of the results observed since the window was last cleared.
///
/// Workers call [`StatWindow::update`] concurrently; the reporting loop
/// reads and resets the window with [`StatWindow::take`], which holds the
/// same lock so no result lands between the read and the reset.
#[derive(Debug)]
pub struct StatWindow {
    tick: WindowTick,
    errors: Counter,
    data: Mutex<WindowData>,
}

/// Owned copy of a window's contents at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub tick: WindowTick,
    /// Successful request latencies in seconds, in arrival order.
    pub lats: Vec<f64>,
    pub error_dist: HashMap<String, u64>,
    pub status_dist: HashMap<u16, u64>,
    pub latency_sum: f64,
    pub size_sum: u64,
    pub error_count: u64,
}

impl StatWindow {
    #[must_use]
    pub fn new(tick: WindowTick) -> Self {
        Self {
            tick,
            errors: Counter::new(),
            data: Mutex::new(WindowData::default()),
        }
    }

    #[must_use]
    pub const fn tick(&self) -> WindowTick {
        self.tick
    }

    #[expect(clippy::float_arithmetic, reason = "Latency sum in seconds")]
    pub fn update(&self, result: &RequestResult) {
        let mut data = self.lock();
        if let Some(error) = result.error.as_ref() {
            let count = data.error_dist.entry(error.clone()).or_insert(0);
            *count = count.saturating_add(1);
            self.errors.incr(1);
        } else {
            let secs = result.elapsed.as_secs_f64();
            data.lats.push(secs);
            data.latency_sum += secs;
            let count = data.status_dist.entry(result.status_code).or_insert(0);
            *count = count.saturating_add(1);
            data.size_sum = data.size_sum.saturating_add(result.content_length);
        }
    }

    /// Error count since the last reset, read without taking the lock.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.errors.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> WindowSnapshot {
        let data = self.lock();
        WindowSnapshot {
            tick: self.tick,
            lats: data.lats.clone(),
            error_dist: data.error_dist.clone(),
            status_dist: data.status_dist.clone(),
            latency_sum: data.latency_sum,
            size_sum: data.size_sum,
            error_count: self.errors.get(),
        }
    }

    /// Returns the window contents and clears it in one step.
    #[must_use]
    pub fn take(&self) -> WindowSnapshot {
        let mut data = self.lock();
        let taken = std::mem::take(&mut *data);
        WindowSnapshot {
            tick: self.tick,
            lats: taken.lats,
            error_dist: taken.error_dist,
            status_dist: taken.status_dist,
            latency_sum: taken.latency_sum,
            size_sum: taken.size_sum,
            error_count: self.errors.take(),
        }
    }

    pub fn clear(&self) {
        drop(self.take());
    }

    fn lock(&self) -> MutexGuard<'_, WindowData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WindowSnapshot {
    #[must_use]
    pub fn success_count(&self) -> u64 {
        u64::try_from(self.lats.len()).unwrap_or(u64::MAX)
    }

    /// Results folded into the window: successes plus errors.
    #[must_use]
    pub fn observed(&self) -> u64 {
        self.success_count().saturating_add(self.error_count)
    }

    pub fn sort_latencies(&mut self) {
        self.lats.sort_by(f64::total_cmp);
    }
}
