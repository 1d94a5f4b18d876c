use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::{debug, info};

use crate::{
    args::RunArgs,
    metrics::CheckRecord,
    shutdown::{ShutdownReceiver, ShutdownSender},
    targets::{TargetList, UrlSelector},
};

use super::{Fetcher, IterationContext, run_iteration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualUserConfig {
    pub vus: usize,
    /// Pause after every iteration.
    pub pause: Duration,
    /// Per-user iteration cap; `None` runs until shutdown.
    pub iterations: Option<u64>,
    pub ramp_up: Option<Duration>,
    pub seed: Option<u64>,
    pub expected_status: u16,
}

impl VirtualUserConfig {
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        Self {
            vus: args.vus.get(),
            pause: args.sleep,
            iterations: args.iterations.map(|value| value.get()),
            ramp_up: args.ramp_up,
            seed: args.seed,
            expected_status: args.expected_status,
        }
    }

    /// Start offset of user `vu` when starts are spread over the ramp window.
    #[must_use]
    pub fn ramp_delay(&self, vu: usize) -> Duration {
        let Some(ramp_up) = self.ramp_up else {
            return Duration::ZERO;
        };
        let vus = u128::try_from(self.vus).unwrap_or(u128::MAX).max(1);
        let vu = u128::try_from(vu).unwrap_or(u128::MAX);
        let nanos = ramp_up
            .as_nanos()
            .saturating_mul(vu)
            .checked_div(vus)
            .unwrap_or(0);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

pub struct VirtualUserContext {
    pub vu: usize,
    pub config: VirtualUserConfig,
    pub fetcher: Arc<dyn Fetcher>,
    pub targets: Arc<TargetList>,
    pub run_start: Instant,
    pub metrics_tx: mpsc::Sender<CheckRecord>,
}

/// Run one user's loop until its cap, a shutdown, or a closed metrics channel.
/// Returns the number of completed iterations.
pub async fn run_virtual_user(ctx: VirtualUserContext, mut shutdown_rx: ShutdownReceiver) -> u64 {
    let VirtualUserContext {
        vu,
        config,
        fetcher,
        targets,
        run_start,
        metrics_tx,
    } = ctx;

    let delay = config.ramp_delay(vu);
    if !delay.is_zero() {
        tokio::select! {
            _ = shutdown_rx.recv() => return 0,
            () = tokio::time::sleep(delay) => {}
        }
    }

    let mut selector = UrlSelector::for_virtual_user(config.seed, vu);
    let iteration_ctx = IterationContext {
        fetcher: fetcher.as_ref(),
        targets: targets.as_ref(),
        expected_status: config.expected_status,
        run_start,
    };

    let mut completed: u64 = 0;
    loop {
        let record = tokio::select! {
            _ = shutdown_rx.recv() => break,
            record = run_iteration(&iteration_ctx, &mut selector, vu, completed) => record,
        };
        completed = completed.saturating_add(1);

        if metrics_tx.send(record).await.is_err() {
            break;
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            () = tokio::time::sleep(config.pause) => {}
        }

        if config.iterations.is_some_and(|cap| completed >= cap) {
            break;
        }
    }

    debug!("Virtual user {} stopped after {} iterations.", vu, completed);
    completed
}

/// Spawn every virtual user, then wait for all of them. Broadcasts shutdown
/// once the last user stops so capped runs end early.
#[must_use]
pub fn setup_virtual_users(
    config: VirtualUserConfig,
    fetcher: &Arc<dyn Fetcher>,
    targets: &Arc<TargetList>,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
    metrics_tx: mpsc::Sender<CheckRecord>,
) -> JoinHandle<()> {
    let mut handles = Vec::with_capacity(config.vus);
    for vu in 0..config.vus {
        let ctx = VirtualUserContext {
            vu,
            config,
            fetcher: Arc::clone(fetcher),
            targets: Arc::clone(targets),
            run_start,
            metrics_tx: metrics_tx.clone(),
        };
        handles.push(tokio::spawn(run_virtual_user(ctx, shutdown_tx.subscribe())));
    }
    drop(metrics_tx);
    info!("Started {} virtual users.", config.vus);

    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut total_iterations: u64 = 0;
        for handle in handles {
            match handle.await {
                Ok(completed) => total_iterations = total_iterations.saturating_add(completed),
                Err(err) => debug!("Virtual user task failed: {}", err),
            }
        }
        debug!("All virtual users finished ({} iterations).", total_iterations);
        drop(shutdown_tx.send(()));
    })
}
