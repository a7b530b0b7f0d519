//! Request construction, per-worker clients, and the dispatch/worker engine.
mod client;
mod dispatcher;
mod rate;
mod request;
mod worker;

#[cfg(test)]
mod tests;

pub use client::{ClientSettings, build_client};
pub use dispatcher::dispatch;
pub use request::{RequestDescriptor, RequestTemplate};
pub use worker::run_worker;
