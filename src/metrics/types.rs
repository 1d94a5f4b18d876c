use std::collections::BTreeMap;
use std::time::Duration;

use crate::args::BasisPoints;

/// Status recorded when a request produced no response.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Outcome of one iteration: one GET and its status check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckRecord {
    pub vu: usize,
    pub iteration: u64,
    pub url_index: usize,
    /// Request start, relative to run start.
    pub elapsed_ms: u64,
    pub latency_ms: u64,
    pub status: Option<u16>,
    pub passed: bool,
    pub timed_out: bool,
    pub transport_error: bool,
    pub response_bytes: u64,
}

impl CheckRecord {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.status {
            Some(status) => status,
            None => NO_RESPONSE_STATUS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Percentiles {
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub duration: Duration,
    pub total_requests: u64,
    pub passed_checks: u64,
    pub failed_checks: u64,
    pub timeout_requests: u64,
    pub transport_errors: u64,
    pub unexpected_status: u64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub avg_latency_ms: u64,
    /// `None` when no request completed.
    pub percentiles: Option<Percentiles>,
    pub status_counts: BTreeMap<u16, u64>,
    /// Selections per target, indexed like the target list.
    pub url_counts: Vec<u64>,
    pub total_bytes: u64,
}

impl RunSummary {
    #[must_use]
    pub fn error_rate(&self) -> BasisPoints {
        BasisPoints::ratio(self.failed_checks, self.total_requests)
    }

    /// Compares the exact failed-check ratio against `max`.
    #[must_use]
    pub fn error_rate_exceeds(&self, max: BasisPoints) -> bool {
        max.exceeded_by(self.failed_checks, self.total_requests)
    }

    #[must_use]
    pub fn pass_rate(&self) -> BasisPoints {
        BasisPoints::ratio(self.passed_checks, self.total_requests)
    }

    /// Average requests per second, scaled by 100.
    #[must_use]
    pub fn avg_rps_x100(&self) -> u64 {
        let duration_ms = self.duration.as_millis().max(1);
        let scaled = u128::from(self.total_requests)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    pub records: Vec<CheckRecord>,
    pub records_truncated: bool,
}
