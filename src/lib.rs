//! Core library for the `barrage` CLI.
//!
//! Exposes the building blocks the binary is assembled from: argument and
//! config types, request templates and per-worker clients, the dispatcher
//! and worker loop, request sources, and the windowed result aggregation.
//! The primary interface is the `barrage` command-line application.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod source;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
