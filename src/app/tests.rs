use super::*;
use crate::args::parse_test_args;
use crate::error::{AppError, ValidationError};
use crate::http::{FetchOutcome, Fetcher};
use crate::targets::TargetList;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const HOME: &str = "https://www.blazedemo.com";
const RESERVE: &str = "https://www.blazedemo.com/reserve.php";

struct StatusFetcher {
    status: u16,
}

#[async_trait]
impl Fetcher for StatusFetcher {
    async fn get(&self, _url: &str) -> FetchOutcome {
        tokio::time::sleep(Duration::from_millis(20)).await;
        FetchOutcome {
            status: Some(self.status),
            response_bytes: 3,
            ..FetchOutcome::default()
        }
    }
}

fn run_paused<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn shared_targets() -> Result<Arc<TargetList>, String> {
    TargetList::new([HOME, RESERVE])
        .map(Arc::new)
        .map_err(|err| err.to_string())
}

#[test]
fn capped_run_aggregates_and_exports() -> Result<(), String> {
    run_paused(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let csv_path = dir.path().join("results.csv");
        let json_path = dir.path().join("summary.json");
        let report_path = dir.path().join("report.md");
        let csv_arg = csv_path.to_string_lossy().into_owned();
        let json_arg = json_path.to_string_lossy().into_owned();
        let report_arg = report_path.to_string_lossy().into_owned();
        let args = parse_test_args([
            "vuload",
            "--vus",
            "3",
            "--iterations",
            "2",
            "--duration",
            "1m",
            "--no-summary",
            "--export-csv",
            csv_arg.as_str(),
            "--export-json",
            json_arg.as_str(),
            "--report",
            report_arg.as_str(),
        ])
        .map_err(|err| err.to_string())?;

        let fetcher: Arc<dyn Fetcher> = Arc::new(StatusFetcher { status: 200 });
        let outcome = run_with_fetcher(&args, &shared_targets()?, &fetcher)
            .await
            .map_err(|err| err.to_string())?;
        let RunOutcome { report, verdict } = outcome;

        if report.summary.total_requests != 6 || report.summary.passed_checks != 6 {
            return Err(format!("Unexpected summary: {:?}", report.summary));
        }
        if report.summary.url_counts.iter().sum::<u64>() != 6 {
            return Err("Per-target counts should add up to the total".to_owned());
        }
        if !verdict.passed() {
            return Err(format!("Expected PASS, got {:?}", verdict));
        }
        if report.summary.duration >= Duration::from_secs(60) {
            return Err("Capped run should end before the duration".to_owned());
        }

        let csv = std::fs::read_to_string(&csv_path)
            .map_err(|err| format!("csv missing: {}", err))?;
        if csv.lines().count() != 7 {
            return Err(format!("Expected header + 6 rows:\n{}", csv));
        }
        for path in [&json_path, &report_path] {
            if !path.exists() {
                return Err(format!("Missing export {}", path.display()));
            }
        }
        Ok(())
    })
}

#[test]
fn enforced_slo_failure_is_an_error_after_exports() -> Result<(), String> {
    run_paused(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let report_path = dir.path().join("report.md");
        let report_arg = report_path.to_string_lossy().into_owned();
        let args = parse_test_args([
            "vuload",
            "--vus",
            "2",
            "--iterations",
            "3",
            "--sleep",
            "0",
            "--no-summary",
            "--enforce-slo",
            "--report",
            report_arg.as_str(),
        ])
        .map_err(|err| err.to_string())?;

        let fetcher: Arc<dyn Fetcher> = Arc::new(StatusFetcher { status: 500 });
        match run_with_fetcher(&args, &shared_targets()?, &fetcher).await {
            Err(AppError::Validation(ValidationError::SloFailed { reasons }))
                if reasons.contains("errors 100.00%") => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(_) => return Err("Expected the SLO failure to be enforced".to_owned()),
        }

        let markdown = std::fs::read_to_string(&report_path)
            .map_err(|err| format!("report missing: {}", err))?;
        if !markdown.contains("**FAIL**") {
            return Err(format!("Report should record the failure:\n{}", markdown));
        }
        Ok(())
    })
}

#[test]
fn failing_checks_pass_without_enforcement() -> Result<(), String> {
    run_paused(async {
        let args = parse_test_args(["vuload", "--vus", "1", "--iterations", "2", "--no-summary"])
            .map_err(|err| err.to_string())?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(StatusFetcher { status: 503 });
        let outcome = run_with_fetcher(&args, &shared_targets()?, &fetcher)
            .await
            .map_err(|err| err.to_string())?;
        if outcome.verdict.passed() || outcome.report.summary.failed_checks != 2 {
            return Err(format!(
                "Expected two failed checks and a FAIL verdict, got {:?}",
                outcome.verdict
            ));
        }
        Ok(())
    })
}
