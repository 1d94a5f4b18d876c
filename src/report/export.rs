use std::borrow::Cow;
use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::ReportError;
use crate::metrics::{CheckRecord, RunReport};
use crate::slo::SloVerdict;

use super::RunContext;

const CSV_HEADER: &[u8] =
    b"timestamp_ms,vu,iteration,url,status,latency_ms,check,timed_out,transport_error,bytes\n";

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Wall-clock timestamp of a record in Unix milliseconds.
fn record_timestamp_ms(ctx: &RunContext<'_>, record: &CheckRecord) -> i64 {
    let offset = i64::try_from(record.elapsed_ms).unwrap_or(i64::MAX);
    ctx.started_at.timestamp_millis().saturating_add(offset)
}

async fn write_csv(
    path: &Path,
    records: &[CheckRecord],
    ctx: &RunContext<'_>,
) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(CSV_HEADER).await?;
    for record in records {
        let url = ctx.targets.get(record.url_index).unwrap_or_default();
        let line = format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            record_timestamp_ms(ctx, record),
            record.vu,
            record.iteration,
            csv_field(url),
            record.status_code(),
            record.latency_ms,
            u8::from(record.passed),
            u8::from(record.timed_out),
            u8::from(record.transport_error),
            record.response_bytes
        );
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Write one CSV row per kept request record.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub async fn export_csv(
    path: &Path,
    records: &[CheckRecord],
    ctx: &RunContext<'_>,
) -> Result<(), ReportError> {
    write_csv(path, records, ctx)
        .await
        .map_err(write_error(path))
}

#[must_use]
pub fn json_payload(
    report: &RunReport,
    verdict: &SloVerdict,
    ctx: &RunContext<'_>,
) -> serde_json::Value {
    let summary = &report.summary;

    let percentiles = summary.percentiles.map(|percentiles| {
        serde_json::json!({
            "p50": percentiles.p50,
            "p90": percentiles.p90,
            "p95": percentiles.p95,
            "p99": percentiles.p99
        })
    });
    let status_counts: serde_json::Map<String, serde_json::Value> = summary
        .status_counts
        .iter()
        .map(|(status, count)| (status.to_string(), serde_json::Value::from(*count)))
        .collect();
    let targets: Vec<serde_json::Value> = ctx
        .targets
        .as_slice()
        .iter()
        .zip(summary.url_counts.iter())
        .map(|(url, count)| serde_json::json!({ "url": url, "requests": count }))
        .collect();
    let records: Vec<serde_json::Value> = report
        .records
        .iter()
        .map(|record| {
            serde_json::json!({
                "timestamp_ms": record_timestamp_ms(ctx, record),
                "elapsed_ms": record.elapsed_ms,
                "vu": record.vu,
                "iteration": record.iteration,
                "url": ctx.targets.get(record.url_index),
                "status": record.status,
                "latency_ms": record.latency_ms,
                "check": record.passed,
                "timed_out": record.timed_out,
                "transport_error": record.transport_error,
                "bytes": record.response_bytes
            })
        })
        .collect();

    serde_json::json!({
        "run": {
            "started_at": ctx.started_at_rfc3339(),
            "vus": ctx.vus,
            "configured_duration_ms": ctx.configured_duration.as_millis(),
            "pause_ms": ctx.pause.as_millis()
        },
        "summary": {
            "duration_ms": summary.duration.as_millis(),
            "total_requests": summary.total_requests,
            "passed_checks": summary.passed_checks,
            "failed_checks": summary.failed_checks,
            "error_rate_bp": summary.error_rate().get(),
            "timeout_requests": summary.timeout_requests,
            "transport_errors": summary.transport_errors,
            "non_expected_status": summary.unexpected_status,
            "min_latency_ms": summary.min_latency_ms,
            "max_latency_ms": summary.max_latency_ms,
            "avg_latency_ms": summary.avg_latency_ms,
            "latency_percentiles_ms": percentiles,
            "avg_rps_x100": summary.avg_rps_x100(),
            "total_bytes": summary.total_bytes,
            "status_counts": status_counts
        },
        "targets": targets,
        "slo": {
            "p95_ms": ctx.thresholds.p95_ms,
            "max_error_rate_bp": ctx.thresholds.max_error_rate.get(),
            "status": verdict.status.as_str(),
            "reasons": verdict.reasons
        },
        "records_truncated": report.records_truncated,
        "records": records
    })
}

/// Write the summary, SLO verdict and kept records as pretty JSON.
///
/// # Errors
///
/// Returns an error when serialization fails or the file cannot be written.
pub async fn export_json(
    path: &Path,
    report: &RunReport,
    verdict: &SloVerdict,
    ctx: &RunContext<'_>,
) -> Result<(), ReportError> {
    let payload = json_payload(report, verdict, ctx);
    let json = serde_json::to_vec_pretty(&payload)
        .map_err(|err| ReportError::Serialize { source: err })?;

    let file = tokio::fs::File::create(path)
        .await
        .map_err(write_error(path))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(write_error(path))?;
    writer.flush().await.map_err(write_error(path))
}
