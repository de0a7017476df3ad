//! Console output formatter for run summaries and indexed documents

use colored::Colorize;
use chatlog_domain::{IngestDocument, RunSummary};

const PREVIEW_LEN: usize = 80;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a run summary
    pub fn format_summary(summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Ingestion Run"));
        output.push('\n');

        if summary.is_noop() {
            output.push_str(&format!("{}\n", "No new files to process".dimmed()));
        } else {
            output.push_str(&Self::row("Files considered", summary.files_considered));
            output.push_str(&Self::row("Documents assembled", summary.documents_assembled));
            output.push_str(&format!(
                "{:<22}{}\n",
                "Documents written:".cyan().bold(),
                summary.documents_written.to_string().green()
            ));
            if summary.documents_failed > 0 {
                output.push_str(&format!(
                    "{:<22}{}\n",
                    "Documents failed:".cyan().bold(),
                    summary.documents_failed.to_string().red()
                ));
            }
            if summary.files_failed > 0 {
                output.push_str(&format!(
                    "{:<22}{} (will be retried)\n",
                    "Files unreadable:".cyan().bold(),
                    summary.files_failed.to_string().yellow()
                ));
            }
            output.push_str(&Self::row("Files committed", summary.files_committed));
        }

        if summary.missing_roots > 0 {
            output.push_str(&format!(
                "{} {} source root(s) missing\n",
                "Warning:".yellow().bold(),
                summary.missing_roots
            ));
        }
        if let Some(error) = &summary.write_error {
            output.push_str(&format!("{} {}\n", "Write failed:".red().bold(), error));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a run summary as JSON
    pub fn format_summary_json(summary: &RunSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format indexed documents, newest first
    pub fn format_hits(title: &str, documents: &[IngestDocument]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(title));
        output.push('\n');

        if documents.is_empty() {
            output.push_str(&format!("{}\n", "No documents found".dimmed()));
        }

        for document in documents {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("── {} ──", document.timestamp).yellow().bold(),
                document.file_name.dimmed()
            ));
            output.push_str(&format!(
                "user={} machine={} ip={} editor={}",
                document.user_id,
                document.metadata.machine_id,
                document.metadata.ip_address,
                document.metadata.editor_version
            ));
            if let Some(model) = &document.metadata.model {
                output.push_str(&format!(" model={}", model));
            }
            output.push('\n');

            for turn in &document.conversation {
                output.push_str(&format!(
                    "  {:>9}: {}\n",
                    turn.role.cyan(),
                    preview(&turn.content)
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format indexed documents as JSON
    pub fn format_hits_json(documents: &[IngestDocument]) -> String {
        serde_json::to_string_pretty(documents).unwrap_or_else(|_| "[]".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn row(label: &str, value: usize) -> String {
        format!("{:<22}{}\n", format!("{}:", label).cyan().bold(), value)
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

/// First line of `text`, shortened on a character boundary.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut shortened: String = line.chars().take(PREVIEW_LEN).collect();
    if shortened.len() < line.len() || text.lines().nth(1).is_some() {
        shortened.push_str("...");
    }
    shortened
}
