//! Service-level objectives checked against a finished run.
use std::fmt;

use crate::args::{BasisPoints, RunArgs};
use crate::metrics::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SloThresholds {
    pub p95_ms: u64,
    pub max_error_rate: BasisPoints,
}

impl SloThresholds {
    #[must_use]
    pub const fn from_args(args: &RunArgs) -> Self {
        Self {
            p95_ms: args.slo_p95_ms.get(),
            max_error_rate: args.slo_error_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SloStatus {
    Pass,
    Fail,
}

impl SloStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for SloStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SloVerdict {
    pub status: SloStatus,
    /// Violations, plus notes on metrics that could not be evaluated.
    pub reasons: Vec<String>,
}

impl SloVerdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == SloStatus::Pass
    }
}

/// A run without requests cannot violate a threshold; missing metrics are
/// noted but do not fail the verdict.
#[must_use]
pub fn evaluate(summary: &RunSummary, thresholds: &SloThresholds) -> SloVerdict {
    let mut status = SloStatus::Pass;
    let mut reasons = Vec::new();

    match summary.percentiles.as_ref() {
        None => reasons.push("p95 unavailable: no requests completed".to_owned()),
        Some(percentiles) if percentiles.p95 > thresholds.p95_ms => {
            status = SloStatus::Fail;
            reasons.push(format!(
                "p95 {} ms > SLO {} ms",
                percentiles.p95, thresholds.p95_ms
            ));
        }
        Some(_) => {}
    }

    if summary.total_requests == 0 {
        reasons.push("error rate unavailable: no requests completed".to_owned());
    } else {
        if summary.error_rate_exceeds(thresholds.max_error_rate) {
            status = SloStatus::Fail;
            reasons.push(format!(
                "errors {} > SLO {}",
                BasisPoints::ratio_ceil(summary.failed_checks, summary.total_requests),
                thresholds.max_error_rate
            ));
        }
    }

    SloVerdict { status, reasons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Percentiles;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn summary(total: u64, failed: u64, p95: Option<u64>) -> RunSummary {
        RunSummary {
            duration: Duration::from_secs(120),
            total_requests: total,
            passed_checks: total.saturating_sub(failed),
            failed_checks: failed,
            timeout_requests: 0,
            transport_errors: 0,
            unexpected_status: failed,
            min_latency_ms: 0,
            max_latency_ms: 0,
            avg_latency_ms: 0,
            percentiles: p95.map(|p95| Percentiles {
                p50: 0,
                p90: 0,
                p95,
                p99: p95,
            }),
            status_counts: BTreeMap::new(),
            url_counts: Vec::new(),
            total_bytes: 0,
        }
    }

    fn thresholds() -> Result<SloThresholds, String> {
        Ok(SloThresholds {
            p95_ms: 1000,
            max_error_rate: BasisPoints::try_from(100).map_err(|err| err.to_string())?,
        })
    }

    #[test]
    fn healthy_run_passes() -> Result<(), String> {
        let verdict = evaluate(&summary(1000, 10, Some(1000)), &thresholds()?);
        if !verdict.passed() || !verdict.reasons.is_empty() {
            return Err(format!("Expected clean pass at the limits, got {:?}", verdict));
        }
        Ok(())
    }

    #[test]
    fn slow_p95_fails() -> Result<(), String> {
        let verdict = evaluate(&summary(1000, 0, Some(1001)), &thresholds()?);
        if verdict.status != SloStatus::Fail
            || verdict.reasons != ["p95 1001 ms > SLO 1000 ms"]
        {
            return Err(format!("Unexpected verdict: {:?}", verdict));
        }
        Ok(())
    }

    #[test]
    fn error_rate_above_threshold_fails() -> Result<(), String> {
        let verdict = evaluate(&summary(1000, 11, Some(200)), &thresholds()?);
        if verdict.status != SloStatus::Fail
            || verdict.reasons != ["errors 1.10% > SLO 1.00%"]
        {
            return Err(format!("Unexpected verdict: {:?}", verdict));
        }
        Ok(())
    }

    #[test]
    fn error_rate_just_above_threshold_fails() -> Result<(), String> {
        let verdict = evaluate(&summary(100_000, 1_009, Some(200)), &thresholds()?);
        if verdict.status != SloStatus::Fail
            || verdict.reasons != ["errors 1.01% > SLO 1.00%"]
        {
            return Err(format!("Expected 1.009% to fail a 1% SLO, got {:?}", verdict));
        }

        let at_limit = evaluate(&summary(100_000, 1_000, Some(200)), &thresholds()?);
        if !at_limit.passed() {
            return Err(format!("Expected exactly 1% to pass, got {:?}", at_limit));
        }
        Ok(())
    }

    #[test]
    fn both_violations_are_reported() -> Result<(), String> {
        let verdict = evaluate(&summary(10, 10, Some(5000)), &thresholds()?);
        if verdict.passed() || verdict.reasons.len() != 2 {
            return Err(format!("Unexpected verdict: {:?}", verdict));
        }
        Ok(())
    }

    #[test]
    fn empty_run_is_noted_not_failed() -> Result<(), String> {
        let verdict = evaluate(&summary(0, 0, None), &thresholds()?);
        if !verdict.passed() || verdict.reasons.len() != 2 {
            return Err(format!("Unexpected verdict: {:?}", verdict));
        }
        if SloStatus::Fail.to_string() != "FAIL" {
            return Err("Unexpected status label".to_owned());
        }
        Ok(())
    }
}
