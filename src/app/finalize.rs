use std::path::Path;

use tracing::{info, warn};

use crate::{
    args::RunArgs,
    error::AppResult,
    metrics::RunReport,
    report::{self, RunContext},
    slo::SloVerdict,
};

pub(super) async fn finalize_run(
    args: &RunArgs,
    report: &RunReport,
    verdict: &SloVerdict,
    ctx: &RunContext<'_>,
) -> AppResult<()> {
    if !args.no_summary {
        report::print_summary(report, verdict, ctx);
    }

    if report.records_truncated && (args.export_csv.is_some() || args.export_json.is_some()) {
        warn!(
            "Exports contain the first {} request records only (--metrics-max).",
            report.records.len()
        );
    }

    if let Some(path) = args.export_csv.as_deref() {
        report::export_csv(Path::new(path), &report.records, ctx).await?;
        info!("Request records written to {}", path);
    }
    if let Some(path) = args.export_json.as_deref() {
        report::export_json(Path::new(path), report, verdict, ctx).await?;
        info!("JSON summary written to {}", path);
    }
    if let Some(path) = args.report.as_deref() {
        report::export_markdown(Path::new(path), &report.summary, verdict, ctx).await?;
        info!("Markdown report written to {}", path);
    }

    info!("SLO verdict: {}", verdict.status);
    Ok(())
}
