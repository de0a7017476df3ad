//! Progress reporting for ingestion runs

use chatlog_application::ports::document_sink::BulkWriteReport;
use chatlog_application::ports::progress::RunProgressNotifier;
use chatlog_domain::{FileTask, RunPhase, RunSummary};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a run with a progress bar over the selected files
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn file_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn phase_display_name(phase: RunPhase) -> &'static str {
        match phase {
            RunPhase::Idle => "Idle",
            RunPhase::Discovering => "Discovering files",
            RunPhase::Extracting => "Extracting",
            RunPhase::Writing => "Writing to sink",
            RunPhase::Committing => "Committing ledger",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgressNotifier for ProgressReporter {
    fn on_phase(&self, phase: RunPhase) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_prefix(Self::phase_display_name(phase));
        }
    }

    fn on_discovered(&self, total: usize) {
        if total == 0 {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::file_style());
        pb.set_prefix(Self::phase_display_name(RunPhase::Extracting));
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_file_processed(&self, task: &FileTask, success: bool) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), task.file_name())
            } else {
                format!("{} {}", "x".red(), task.file_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_write_complete(&self, report: &BulkWriteReport) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(format!(
                "{} indexed, {} rejected",
                report.success_count, report.failed_count
            ));
        }
    }

    fn on_run_complete(&self, _summary: &RunSummary) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{}", "Run complete!".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RunProgressNotifier for SimpleProgress {
    fn on_phase(&self, phase: RunPhase) {
        if phase != RunPhase::Idle {
            println!(
                "{} {}",
                "->".cyan(),
                ProgressReporter::phase_display_name(phase).bold()
            );
        }
    }

    fn on_discovered(&self, total: usize) {
        println!("  {} file(s) selected", total);
    }

    fn on_file_processed(&self, task: &FileTask, success: bool) {
        if success {
            println!("  {} {}", "v".green(), task.file_name());
        } else {
            println!("  {} {} (unreadable)", "x".red(), task.file_name());
        }
    }

    fn on_write_complete(&self, report: &BulkWriteReport) {
        println!(
            "  {} indexed, {} rejected",
            report.success_count, report.failed_count
        );
    }

    fn on_run_complete(&self, _summary: &RunSummary) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_reporter_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        let task = FileTask::new("/data/logs/alice/chat-panel/a.json", "alice", SystemTime::now());

        reporter.on_phase(RunPhase::Discovering);
        reporter.on_discovered(2);
        reporter.on_phase(RunPhase::Extracting);
        reporter.on_file_processed(&task, true);
        reporter.on_file_processed(&task, false);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| pb.position());
        assert_eq!(position, Some(2));

        reporter.on_run_complete(&RunSummary::default());
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_reporter_skips_bar_for_empty_run() {
        let reporter = ProgressReporter::default();
        reporter.on_discovered(0);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
