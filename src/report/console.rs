use crate::metrics::{NO_RESPONSE_STATUS, RunReport};
use crate::slo::SloVerdict;

use super::{RunContext, format_duration, format_seconds, format_x100};

#[must_use]
pub fn render_summary(report: &RunReport, verdict: &SloVerdict, ctx: &RunContext<'_>) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        format!("Started: {}", ctx.started_at_rfc3339()),
        format!(
            "Duration: {}s (configured {})",
            format_seconds(summary.duration),
            format_duration(ctx.configured_duration)
        ),
        format!("Virtual Users: {}", ctx.vus),
        format!("Pause: {}", format_duration(ctx.pause)),
        format!("Total Requests: {}", summary.total_requests),
        format!(
            "Checks Passed: {} ({})",
            summary.passed_checks,
            summary.pass_rate()
        ),
        format!(
            "Checks Failed: {} ({})",
            summary.failed_checks,
            summary.error_rate()
        ),
        format!("Timeouts: {}", summary.timeout_requests),
        format!("Transport Errors: {}", summary.transport_errors),
        format!("Non-Expected Status: {}", summary.unexpected_status),
        format!(
            "Min/Avg/Max Latency: {}ms / {}ms / {}ms",
            summary.min_latency_ms, summary.avg_latency_ms, summary.max_latency_ms
        ),
    ];

    lines.push(summary.percentiles.map_or_else(
        || "P50/P90/P95/P99 Latency: n/a".to_owned(),
        |percentiles| {
            format!(
                "P50/P90/P95/P99 Latency: {}ms / {}ms / {}ms / {}ms",
                percentiles.p50, percentiles.p90, percentiles.p95, percentiles.p99
            )
        },
    ));
    lines.push(format!("Avg RPS: {}", format_x100(summary.avg_rps_x100())));
    lines.push(format!("Data Received: {} bytes", summary.total_bytes));

    if !summary.status_counts.is_empty() {
        let statuses: Vec<String> = summary
            .status_counts
            .iter()
            .map(|(status, count)| {
                if *status == NO_RESPONSE_STATUS {
                    format!("no response={}", count)
                } else {
                    format!("{}={}", status, count)
                }
            })
            .collect();
        lines.push(format!("Status Codes: {}", statuses.join(", ")));
    }

    lines.push("Requests per Target:".to_owned());
    for (url, count) in ctx.targets.iter().zip(summary.url_counts.iter()) {
        lines.push(format!("  {}: {}", url, count));
    }
    if report.records_truncated {
        lines.push(format!(
            "Records: {} kept for export (truncated)",
            report.records.len()
        ));
    }

    lines.push(format!(
        "SLO (p95 <= {}ms, errors <= {}): {}",
        ctx.thresholds.p95_ms, ctx.thresholds.max_error_rate, verdict.status
    ));
    lines.extend(verdict.reasons.iter().map(|reason| format!("  - {}", reason)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn print_summary(report: &RunReport, verdict: &SloVerdict, ctx: &RunContext<'_>) {
    print!("{}", render_summary(report, verdict, ctx));
}
