//! Run Ingestion use case
//!
//! Orchestrates one ingestion cycle: discover unprocessed files, assemble a
//! document per file, bulk-write the batch, then record the files in the
//! dedup ledger.
//!
//! Delivery is at-least-once. A crash between the write and the ledger
//! commit means the next run picks the same files up again.

use crate::config::IngestParams;
use crate::ports::document_sink::{BulkWriteReport, DocumentSink, SinkError};
use crate::ports::ledger::{DedupLedger, LedgerError};
use crate::ports::progress::{NoRunProgress, RunProgressNotifier};
use crate::ports::record_reader::RecordReader;
use crate::ports::source_scanner::{DiscoveryError, SourceScanner};
use crate::use_cases::shared::check_cancelled;
use chatlog_domain::{CommitPolicy, IngestDocument, RunPhase, RunSummary, assemble};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum RunIngestionError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Run cancelled")]
    Cancelled,
}

impl RunIngestionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunIngestionError::Cancelled)
    }
}

/// Use case for running ingestion cycles
///
/// Owns the ledger: a run takes `&mut self`, so only one run can touch it
/// at a time.
pub struct RunIngestionUseCase<L: DedupLedger> {
    ledger: L,
    scanner: Arc<dyn SourceScanner>,
    reader: Arc<dyn RecordReader>,
    sink: Arc<dyn DocumentSink>,
    params: IngestParams,
    cancellation_token: Option<CancellationToken>,
    phase: RunPhase,
}

impl<L: DedupLedger> RunIngestionUseCase<L> {
    pub fn new(
        ledger: L,
        scanner: Arc<dyn SourceScanner>,
        reader: Arc<dyn RecordReader>,
        sink: Arc<dyn DocumentSink>,
        params: IngestParams,
    ) -> Self {
        Self {
            ledger,
            scanner,
            reader,
            sink,
            params,
            cancellation_token: None,
            phase: RunPhase::Idle,
        }
    }

    /// Set a cancellation token, checked between files.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn params(&self) -> &IngestParams {
        &self.params
    }

    /// Count files waiting for ingestion without reading them.
    pub fn pending_files(&self) -> Result<usize, RunIngestionError> {
        let report = self
            .scanner
            .discover(&self.ledger, self.params.max_files_per_batch)?;
        Ok(report.tasks.len())
    }

    /// Run one cycle with default (no-op) progress
    pub async fn run_once(&mut self) -> Result<RunSummary, RunIngestionError> {
        self.run_once_with_progress(&NoRunProgress).await
    }

    /// Run one cycle with progress callbacks
    pub async fn run_once_with_progress(
        &mut self,
        progress: &dyn RunProgressNotifier,
    ) -> Result<RunSummary, RunIngestionError> {
        let result = self.execute_run(progress).await;
        self.enter(RunPhase::Idle, progress);

        match &result {
            Ok(summary) => progress.on_run_complete(summary),
            Err(RunIngestionError::Cancelled) => info!("Run cancelled, nothing committed"),
            Err(e) => error!("Run failed: {}", e),
        }
        result
    }

    async fn execute_run(
        &mut self,
        progress: &dyn RunProgressNotifier,
    ) -> Result<RunSummary, RunIngestionError> {
        check_cancelled(&self.cancellation_token)?;
        let mut summary = RunSummary::default();

        // ==================== Discover ====================
        self.enter(RunPhase::Discovering, progress);
        let discovery = self
            .scanner
            .discover(&self.ledger, self.params.max_files_per_batch)?;
        summary.files_considered = discovery.tasks.len();
        summary.missing_roots = discovery.missing_roots.len();

        if discovery.tasks.is_empty() {
            info!("No new files to process");
            return Ok(summary);
        }
        info!(
            "Processing {} files from {} roots",
            discovery.tasks.len(),
            discovery.roots_scanned
        );
        progress.on_discovered(discovery.tasks.len());

        // ==================== Extract ====================
        self.enter(RunPhase::Extracting, progress);
        let mut keys = Vec::with_capacity(discovery.tasks.len());
        let mut documents = Vec::with_capacity(discovery.tasks.len());

        for task in &discovery.tasks {
            check_cancelled(&self.cancellation_token)?;

            match self.reader.read(&task.path) {
                Ok(record) => {
                    let document = assemble(task, &record, Utc::now());
                    debug!(
                        "Assembled {} ({} turns)",
                        document.file_name,
                        document.conversation.len()
                    );
                    keys.push(task.ledger_key());
                    documents.push(document);
                    progress.on_file_processed(task, true);
                }
                Err(e) => {
                    warn!("Skipping file: {}", e);
                    summary.files_failed += 1;
                    progress.on_file_processed(task, false);
                }
            }
        }

        summary.documents_assembled = documents.len();
        if documents.is_empty() {
            warn!("No documents assembled from {} files", summary.files_considered);
            return Ok(summary);
        }
        check_cancelled(&self.cancellation_token)?;

        // ==================== Write ====================
        self.enter(RunPhase::Writing, progress);
        let outcome = self.write_batch(documents).await;
        match &outcome {
            Ok(report) => {
                summary.documents_written = report.success_count;
                summary.documents_failed = report.failed_count;
                if report.failed_count > 0 {
                    warn!(
                        "{} of {} documents rejected by sink: {}",
                        report.failed_count,
                        summary.documents_assembled,
                        report.errors.join("; ")
                    );
                }
                progress.on_write_complete(report);
            }
            Err(e) => {
                error!("Write step abandoned: {}", e);
                summary.documents_failed = summary.documents_assembled;
                summary.write_error = Some(e.to_string());
            }
        }

        // ==================== Commit ====================
        self.enter(RunPhase::Committing, progress);
        let commit_keys = select_commit_keys(self.params.commit_policy, keys, &outcome);
        if !commit_keys.is_empty() {
            self.ledger.record_batch(&commit_keys)?;
        }
        summary.files_committed = commit_keys.len();

        info!(
            "Run complete: {} considered, {} written, {} committed",
            summary.files_considered, summary.documents_written, summary.files_committed
        );
        Ok(summary)
    }

    async fn write_batch(
        &self,
        documents: Vec<IngestDocument>,
    ) -> Result<BulkWriteReport, SinkError> {
        if self.sink.ensure_index().await? {
            info!("Created index {}", self.sink.index_name());
        }
        self.sink.bulk_write(documents).await
    }

    fn enter(&mut self, phase: RunPhase, progress: &dyn RunProgressNotifier) {
        if self.phase == phase {
            return;
        }
        if !self.phase.can_transition_to(phase) {
            warn!("Illegal run phase transition: {} -> {}", self.phase, phase);
            debug_assert!(false, "illegal run phase transition {} -> {}", self.phase, phase);
        }
        debug!("Run phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        progress.on_phase(phase);
    }
}

/// Ledger keys to record for this run.
fn select_commit_keys(
    policy: CommitPolicy,
    keys: Vec<String>,
    outcome: &Result<BulkWriteReport, SinkError>,
) -> Vec<String> {
    match (policy, outcome) {
        (CommitPolicy::Extracted, _) => keys,
        (CommitPolicy::Acknowledged, Ok(report)) => keys
            .into_iter()
            .enumerate()
            .filter(|(index, _)| report.is_accepted(*index))
            .map(|(_, key)| key)
            .collect(),
        (CommitPolicy::Acknowledged, Err(_)) => Vec::new(),
    }
}
