mod progress;
mod runner;
pub(crate) mod summary;
mod table;


pub(crate) use runner::{RunOutcome, RunSettings, run_load};
pub(crate) use summary::print_summary;
