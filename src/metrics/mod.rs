//! Result aggregation: counters, statistics windows, and the report that
//! fans every result out to the second, half-minute, and total windows.
mod counter;
mod report;
mod types;
mod window;


pub use counter::Counter;
pub use report::{HALF_TICK_SECS, Report, SECOND_TICK_SECS};
pub use types::RequestResult;
pub use window::{StatWindow, WindowSnapshot, WindowTick};
