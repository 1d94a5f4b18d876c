use std::collections::BTreeMap;
use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::args::RunArgs;
use crate::shutdown::ShutdownSender;

use super::{CheckRecord, LatencyHistogram, RunReport, RunSummary};

/// Upper bound on waiting for in-flight records once the run has stopped.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub duration: Duration,
    pub progress_interval: Duration,
    pub metrics_max: usize,
    pub target_count: usize,
}

impl CollectorSettings {
    #[must_use]
    pub const fn from_args(args: &RunArgs, target_count: usize) -> Self {
        Self {
            duration: args.duration,
            progress_interval: args.progress_interval,
            metrics_max: args.metrics_max.get(),
            target_count,
        }
    }
}

pub(crate) struct CollectorState {
    total_requests: u64,
    passed_checks: u64,
    timeout_requests: u64,
    transport_errors: u64,
    unexpected_status: u64,
    latency_sum_ms: u128,
    min_latency_ms: u64,
    max_latency_ms: u64,
    total_bytes: u64,
    status_counts: BTreeMap<u16, u64>,
    url_counts: Vec<u64>,
    histogram: Option<LatencyHistogram>,
    histogram_failed: bool,
    records: Vec<CheckRecord>,
    metrics_max: usize,
    records_truncated: bool,
}

impl CollectorState {
    pub(crate) fn new(target_count: usize, metrics_max: usize) -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Latency percentiles disabled: {}", err);
                None
            }
        };
        Self {
            total_requests: 0,
            passed_checks: 0,
            timeout_requests: 0,
            transport_errors: 0,
            unexpected_status: 0,
            latency_sum_ms: 0,
            min_latency_ms: u64::MAX,
            max_latency_ms: 0,
            total_bytes: 0,
            status_counts: BTreeMap::new(),
            url_counts: vec![0; target_count],
            histogram,
            histogram_failed: false,
            records: Vec::new(),
            metrics_max,
            records_truncated: false,
        }
    }

    pub(crate) fn record(&mut self, record: CheckRecord) {
        self.total_requests = self.total_requests.saturating_add(1);
        if record.passed {
            self.passed_checks = self.passed_checks.saturating_add(1);
        }
        if record.timed_out {
            self.timeout_requests = self.timeout_requests.saturating_add(1);
        }
        if record.transport_error {
            self.transport_errors = self.transport_errors.saturating_add(1);
        }
        if record.status.is_some() && !record.passed {
            self.unexpected_status = self.unexpected_status.saturating_add(1);
        }

        self.latency_sum_ms = self
            .latency_sum_ms
            .saturating_add(u128::from(record.latency_ms));
        self.min_latency_ms = self.min_latency_ms.min(record.latency_ms);
        self.max_latency_ms = self.max_latency_ms.max(record.latency_ms);
        self.total_bytes = self.total_bytes.saturating_add(record.response_bytes);

        let status_entry = self.status_counts.entry(record.status_code()).or_insert(0);
        *status_entry = status_entry.saturating_add(1);
        if let Some(count) = self.url_counts.get_mut(record.url_index) {
            *count = count.saturating_add(1);
        }

        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(record.latency_ms)
            && !self.histogram_failed
        {
            warn!("Failed to record latency: {}", err);
            self.histogram_failed = true;
        }

        if self.records.len() < self.metrics_max {
            self.records.push(record);
        } else if !self.records_truncated {
            warn!(
                "Request record limit of {} reached; exports will be truncated.",
                self.metrics_max
            );
            self.records_truncated = true;
        }
    }

    fn log_progress(&self, elapsed: Duration) {
        let failed = self.total_requests.saturating_sub(self.passed_checks);
        let p95 = self
            .histogram
            .as_ref()
            .map_or(0, |histogram| histogram.quantile(0.95));
        info!(
            "{}s elapsed: {} requests, {} failed checks, p95 {}ms",
            elapsed.as_secs(),
            self.total_requests,
            failed,
            p95
        );
    }

    pub(crate) fn finish(self, duration: Duration) -> RunReport {
        let has_requests = self.total_requests > 0;
        let avg_latency_ms = if has_requests {
            let avg = self
                .latency_sum_ms
                .checked_div(u128::from(self.total_requests))
                .unwrap_or(0);
            u64::try_from(avg).map_or(u64::MAX, |value| value)
        } else {
            0
        };
        let min_latency_ms = if has_requests { self.min_latency_ms } else { 0 };
        let percentiles = self
            .histogram
            .as_ref()
            .and_then(LatencyHistogram::percentiles);

        RunReport {
            summary: RunSummary {
                duration,
                total_requests: self.total_requests,
                passed_checks: self.passed_checks,
                failed_checks: self.total_requests.saturating_sub(self.passed_checks),
                timeout_requests: self.timeout_requests,
                transport_errors: self.transport_errors,
                unexpected_status: self.unexpected_status,
                min_latency_ms,
                max_latency_ms: self.max_latency_ms,
                avg_latency_ms,
                percentiles,
                status_counts: self.status_counts,
                url_counts: self.url_counts,
                total_bytes: self.total_bytes,
            },
            records: self.records,
            records_truncated: self.records_truncated,
        }
    }
}

/// Spawn the aggregator. It ends the run when `duration` elapses and stops
/// when a shutdown is broadcast or every record sender is dropped.
#[must_use]
pub fn setup_metrics_collector(
    settings: CollectorSettings,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
    mut metrics_rx: mpsc::Receiver<CheckRecord>,
) -> JoinHandle<RunReport> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut state = CollectorState::new(settings.target_count, settings.metrics_max);
        let shutdown_timer = tokio::time::sleep(settings.duration);
        tokio::pin!(shutdown_timer);
        let first_tick = Instant::now()
            .checked_add(settings.progress_interval)
            .unwrap_or_else(Instant::now);
        let mut progress = tokio::time::interval_at(first_tick, settings.progress_interval);
        progress.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = &mut shutdown_timer => {
                    info!("Run duration of {:?} reached.", settings.duration);
                    drop(shutdown_tx.send(()));
                    break;
                },
                _ = shutdown_rx.recv() => break,
                maybe_record = metrics_rx.recv() => match maybe_record {
                    Some(record) => state.record(record),
                    None => {
                        debug!("All virtual users finished.");
                        drop(shutdown_tx.send(()));
                        break;
                    }
                },
                _ = progress.tick() => state.log_progress(run_start.elapsed()),
            }
        }

        let drain_deadline = tokio::time::sleep(DRAIN_TIMEOUT);
        tokio::pin!(drain_deadline);
        loop {
            tokio::select! {
                () = &mut drain_deadline => break,
                maybe_record = metrics_rx.recv() => match maybe_record {
                    Some(record) => state.record(record),
                    None => break,
                },
            }
        }

        state.finish(run_start.elapsed())
    })
}
