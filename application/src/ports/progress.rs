//! Progress notification port
//!
//! Defines the interface for reporting progress during an ingestion run.

use super::document_sink::BulkWriteReport;
use chatlog_domain::{FileTask, RunPhase, RunSummary};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer.
pub trait RunProgressNotifier: Send + Sync {
    /// Called on every phase change
    fn on_phase(&self, phase: RunPhase);

    /// Called once discovery has selected the files for this run
    fn on_discovered(&self, total: usize);

    /// Called after each file has been read and assembled (or skipped)
    fn on_file_processed(&self, task: &FileTask, success: bool);

    fn on_write_complete(&self, _report: &BulkWriteReport) {}

    fn on_run_complete(&self, _summary: &RunSummary) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoRunProgress;

impl RunProgressNotifier for NoRunProgress {
    fn on_phase(&self, _phase: RunPhase) {}
    fn on_discovered(&self, _total: usize) {}
    fn on_file_processed(&self, _task: &FileTask, _success: bool) {}
}
