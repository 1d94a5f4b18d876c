use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{
    args::RunArgs,
    error::{AppError, AppResult, ValidationError},
    http::{Fetcher, ReqwestFetcher, VirtualUserConfig, build_client, setup_virtual_users},
    metrics::{CheckRecord, CollectorSettings, RunReport, setup_metrics_collector},
    report::RunContext,
    shutdown::{setup_signal_shutdown_handler, shutdown_channel},
    slo::{SloThresholds, SloVerdict, evaluate},
    targets::TargetList,
};

use super::finalize::finalize_run;

/// Buffered check records between virtual users and the collector.
const METRICS_CHANNEL_CAPACITY: usize = 10_000;

pub(crate) struct RunOutcome {
    pub(crate) report: RunReport,
    pub(crate) verdict: SloVerdict,
}

pub(crate) async fn run_local(args: &RunArgs, targets: TargetList) -> AppResult<RunOutcome> {
    let client = build_client(args)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(client));
    run_with_fetcher(args, &Arc::new(targets), &fetcher).await
}

/// Drive a complete run: virtual users, aggregation, SLO check and outputs.
///
/// With `--enforce-slo`, a failed verdict is returned as an error after the
/// summary and exports have been written.
pub(crate) async fn run_with_fetcher(
    args: &RunArgs,
    targets: &Arc<TargetList>,
    fetcher: &Arc<dyn Fetcher>,
) -> AppResult<RunOutcome> {
    info!(
        "Starting {} virtual users against {} targets for {:?}.",
        args.vus.get(),
        targets.len(),
        args.duration
    );

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let (metrics_tx, metrics_rx) = mpsc::channel::<CheckRecord>(METRICS_CHANNEL_CAPACITY);

    let started_at = Utc::now();
    let run_start = Instant::now();
    let collector = setup_metrics_collector(
        CollectorSettings::from_args(args, targets.len()),
        run_start,
        &shutdown_tx,
        metrics_rx,
    );
    let users = setup_virtual_users(
        VirtualUserConfig::from_args(args),
        fetcher,
        targets,
        run_start,
        &shutdown_tx,
        metrics_tx,
    );

    let report = collector.await?;
    users.await?;
    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        warn!("Signal handler task failed: {}", err);
    }

    let thresholds = SloThresholds::from_args(args);
    let verdict = evaluate(&report.summary, &thresholds);
    let ctx = RunContext {
        targets: targets.as_ref(),
        vus: args.vus.get(),
        configured_duration: args.duration,
        pause: args.sleep,
        thresholds,
        started_at,
    };
    finalize_run(args, &report, &verdict, &ctx).await?;

    if args.enforce_slo && !verdict.passed() {
        return Err(AppError::validation(ValidationError::SloFailed {
            reasons: verdict.reasons.join("; "),
        }));
    }
    Ok(RunOutcome { report, verdict })
}
