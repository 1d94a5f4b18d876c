//! Core library for the `vuload` CLI.
//!
//! Virtual users repeatedly pick a random target URL, issue a GET, check the
//! response status and pause. This crate exposes the pieces the binary wires
//! together: CLI and config types, the target list, the HTTP iteration runner,
//! metrics aggregation, SLO evaluation and report writers.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod shutdown;
pub mod slo;
pub mod targets;
