//! Check records, latency histograms, and the run-wide aggregator.
mod collector;
mod histogram;
mod types;


pub use collector::{CollectorSettings, setup_metrics_collector};
pub use histogram::LatencyHistogram;
pub use types::{CheckRecord, NO_RESPONSE_STATUS, Percentiles, RunReport, RunSummary};

#[cfg(test)]
pub(crate) use collector::CollectorState;
