use std::path::Path;

use crate::error::ReportError;
use crate::metrics::RunSummary;
use crate::slo::SloVerdict;

use super::{RunContext, format_duration, format_seconds, format_x100};

/// Targets listed by name in the report; the rest are counted.
const TARGET_SAMPLE: usize = 3;

fn target_sample(ctx: &RunContext<'_>) -> String {
    let sample: Vec<String> = ctx
        .targets
        .iter()
        .take(TARGET_SAMPLE)
        .map(|url| format!("`{}`", url))
        .collect();
    let remaining = ctx.targets.len().saturating_sub(TARGET_SAMPLE);
    if remaining == 0 {
        sample.join(", ")
    } else {
        format!("{} (+{} more)", sample.join(", "), remaining)
    }
}

#[must_use]
pub fn render_markdown(summary: &RunSummary, verdict: &SloVerdict, ctx: &RunContext<'_>) -> String {
    let latency = summary.percentiles.map_or_else(
        || "n/a".to_owned(),
        |percentiles| {
            format!(
                "{} / {} / {} / {}",
                percentiles.p50, percentiles.p90, percentiles.p95, percentiles.p99
            )
        },
    );
    let reasons = if verdict.reasons.is_empty() {
        "none".to_owned()
    } else {
        verdict.reasons.join("; ")
    };

    let lines = [
        "# Load test report".to_owned(),
        String::new(),
        "## Context".to_owned(),
        String::new(),
        format!("- Started: {}", ctx.started_at_rfc3339()),
        format!("- Virtual users: {}", ctx.vus),
        format!(
            "- Configured duration: {}",
            format_duration(ctx.configured_duration)
        ),
        format!("- Measured window: {} s", format_seconds(summary.duration)),
        format!("- Pause per iteration: {}", format_duration(ctx.pause)),
        format!(
            "- Target URLs ({}): {}",
            ctx.targets.len(),
            target_sample(ctx)
        ),
        String::new(),
        "## Metrics".to_owned(),
        String::new(),
        "| Metric | Value |".to_owned(),
        "|---|---|".to_owned(),
        format!("| Total requests | {} |", summary.total_requests),
        format!("| Avg RPS | {} req/s |", format_x100(summary.avg_rps_x100())),
        format!("| Latency p50 / p90 / p95 / p99 (ms) | {} |", latency),
        format!(
            "| Latency min / avg / max (ms) | {} / {} / {} |",
            summary.min_latency_ms, summary.avg_latency_ms, summary.max_latency_ms
        ),
        format!("| Failed checks | {} |", summary.failed_checks),
        format!("| Error rate | {} |", summary.error_rate()),
        String::new(),
        "## SLO validation".to_owned(),
        String::new(),
        format!(
            "- Thresholds: p95 <= {} ms, errors <= {}",
            ctx.thresholds.p95_ms, ctx.thresholds.max_error_rate
        ),
        format!("- Result: **{}**", verdict.status),
        format!("- Reasons: {}", reasons),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write the Markdown report.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub async fn export_markdown(
    path: &Path,
    summary: &RunSummary,
    verdict: &SloVerdict,
    ctx: &RunContext<'_>,
) -> Result<(), ReportError> {
    let markdown = render_markdown(summary, verdict, ctx);
    tokio::fs::write(path, markdown)
        .await
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
