//! Run triggers: one-shot, fixed interval, and directory poll
//!
//! Every trigger goes through the same run guard. A tick that finds a run
//! still in progress is skipped.

use chatlog_application::{DedupLedger, RunIngestionError, RunIngestionUseCase, RunProgressNotifier};
use chatlog_domain::RunSummary;
use chatlog_presentation::{ConsoleFormatter, OutputFormat};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3600);

/// Drives a use case from the binary's run modes
pub struct Trigger<L: DedupLedger> {
    runner: Arc<Mutex<RunIngestionUseCase<L>>>,
    progress: Arc<dyn RunProgressNotifier>,
    output: OutputFormat,
    token: CancellationToken,
}

impl<L: DedupLedger + Sync + 'static> Trigger<L> {
    pub fn new(
        use_case: RunIngestionUseCase<L>,
        progress: Arc<dyn RunProgressNotifier>,
        output: OutputFormat,
        token: CancellationToken,
    ) -> Self {
        Self {
            runner: Arc::new(Mutex::new(use_case.with_cancellation(token.clone()))),
            progress,
            output,
            token,
        }
    }

    /// Run a single cycle and print its summary.
    pub async fn run_once(&self) -> Result<RunSummary, RunIngestionError> {
        let mut runner = self.runner.lock().await;
        let summary = runner.run_once_with_progress(self.progress.as_ref()).await?;
        print_summary(&summary, self.output);
        Ok(summary)
    }

    /// Run now, then every `interval` until cancelled.
    pub async fn run_scheduled(&self, interval: Duration) {
        info!("Scheduling runs every {}s", interval.as_secs());
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut heartbeat = tokio::time::interval_at(
            Instant::now() + HEARTBEAT_INTERVAL,
            HEARTBEAT_INTERVAL,
        );

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {
                    self.try_start();
                }
                _ = heartbeat.tick() => info!("Scheduler alive"),
            }
        }

        self.drain().await;
    }

    /// Poll for pending files and run when some are found, at most once per
    /// `interval` after the first run.
    pub async fn run_watcher(&self, poll: Duration, interval: Duration) {
        info!(
            "Watching for new files every {}s (min {}s between runs)",
            poll.as_secs(),
            interval.as_secs()
        );
        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_run: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if last_run.is_some_and(|started| started.elapsed() < interval) {
                continue;
            }

            let pending = match self.runner.try_lock() {
                Ok(runner) => runner.pending_files(),
                Err(_) => continue,
            };
            match pending {
                Ok(0) => {}
                Ok(count) => {
                    info!("{} new files pending", count);
                    if self.try_start().is_some() {
                        last_run = Some(Instant::now());
                    }
                }
                Err(e) => warn!("Pending-file check failed: {}", e),
            }
        }

        self.drain().await;
    }

    /// Spawn a run unless one is already in progress.
    fn try_start(&self) -> Option<JoinHandle<()>> {
        let Ok(mut runner) = self.runner.clone().try_lock_owned() else {
            info!("Previous run still in progress, skipping tick");
            return None;
        };

        let progress = Arc::clone(&self.progress);
        let output = self.output;
        Some(tokio::spawn(async move {
            match runner.run_once_with_progress(progress.as_ref()).await {
                Ok(summary) if summary.is_noop() => debug!("Nothing to ingest"),
                Ok(summary) => print_summary(&summary, output),
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!("Run failed, retrying next cycle: {}", e),
            }
        }))
    }

    /// Wait for an in-flight run to observe cancellation.
    async fn drain(&self) {
        info!("Shutting down");
        let _runner = self.runner.lock().await;
    }
}

fn print_summary(summary: &RunSummary, output: OutputFormat) {
    let text = match output {
        OutputFormat::Text => ConsoleFormatter::format_summary(summary),
        OutputFormat::Json => ConsoleFormatter::format_summary_json(summary),
    };
    println!("{}", text);
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
