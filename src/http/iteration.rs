use std::time::Duration;

use tokio::time::Instant;

use crate::metrics::CheckRecord;
use crate::targets::{TargetList, UrlSelector};

use super::Fetcher;

/// Read-only state shared by every iteration of one virtual user.
pub struct IterationContext<'ctx> {
    pub fetcher: &'ctx dyn Fetcher,
    pub targets: &'ctx TargetList,
    pub expected_status: u16,
    pub run_start: Instant,
}

const NANOS_PER_MILLI: u128 = 1_000_000;

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Whole milliseconds, rounded up so a partial millisecond over a threshold
/// still counts as over it.
fn latency_millis(duration: Duration) -> u64 {
    let nanos = duration.as_nanos();
    let whole = nanos / NANOS_PER_MILLI;
    let rounded = if nanos % NANOS_PER_MILLI == 0 {
        whole
    } else {
        whole.saturating_add(1)
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Pick a target, GET it, and check the status. Never fails: a missing
/// response or an unexpected status is recorded as a failed check.
pub async fn run_iteration(
    ctx: &IterationContext<'_>,
    selector: &mut UrlSelector,
    vu: usize,
    iteration: u64,
) -> CheckRecord {
    let (url_index, url) = selector.pick(ctx.targets);
    let started = Instant::now();
    let outcome = ctx.fetcher.get(url).await;
    let latency_ms = latency_millis(started.elapsed());

    let passed = outcome.status == Some(ctx.expected_status)
        && !outcome.timed_out
        && !outcome.transport_error;

    CheckRecord {
        vu,
        iteration,
        url_index,
        elapsed_ms: millis(started.saturating_duration_since(ctx.run_start)),
        latency_ms,
        status: outcome.status,
        passed,
        timed_out: outcome.timed_out,
        transport_error: outcome.transport_error,
        response_bytes: outcome.response_bytes,
    }
}
