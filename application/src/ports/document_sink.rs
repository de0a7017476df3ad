//! Document sink port
//!
//! Defines the searchable store that ingested documents are written to.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use chatlog_domain::IngestDocument;
use thiserror::Error;

/// How many rejection reasons a report keeps.
pub const MAX_REPORTED_ERRORS: usize = 5;

/// Errors that make a whole sink operation fail
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to create index {index}: {message}")]
    IndexCreation { index: String, message: String },

    #[error("Bulk write failed: {0}")]
    BulkWrite(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Timeout")]
    Timeout,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Outcome of a bulk write that reached the sink.
///
/// Individual rejections are part of a successful write, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkWriteReport {
    pub success_count: usize,
    pub failed_count: usize,
    /// Acceptance per document, in submission order.
    pub accepted: Vec<bool>,
    /// First few rejection reasons.
    pub errors: Vec<String>,
}

impl BulkWriteReport {
    /// Build a report from per-document outcomes (`None` = accepted).
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                None => {
                    report.success_count += 1;
                    report.accepted.push(true);
                }
                Some(reason) => {
                    report.failed_count += 1;
                    report.accepted.push(false);
                    if report.errors.len() < MAX_REPORTED_ERRORS {
                        report.errors.push(reason);
                    }
                }
            }
        }
        report
    }

    /// Whether the document at `index` was accepted. Unreported documents
    /// count as rejected.
    pub fn is_accepted(&self, index: usize) -> bool {
        self.accepted.get(index).copied().unwrap_or(false)
    }
}

/// Searchable document store
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Logical name of the target index
    fn index_name(&self) -> &str;

    /// Create the index if absent. `Ok(true)` when it was created now.
    async fn ensure_index(&self) -> Result<bool, SinkError>;

    /// Write a batch, reporting per-document acceptance.
    async fn bulk_write(
        &self,
        documents: Vec<IngestDocument>,
    ) -> Result<BulkWriteReport, SinkError>;

    /// Most recent documents of one user, newest first.
    async fn search_by_user(
        &self,
        user_id: &str,
        size: usize,
    ) -> Result<Vec<IngestDocument>, SinkError>;
}
