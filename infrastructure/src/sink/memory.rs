//! In-memory document sink.

use async_trait::async_trait;
use chatlog_application::{BulkWriteReport, DocumentSink, SinkError};
use chatlog_domain::IngestDocument;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

type RejectFn = Box<dyn Fn(&IngestDocument) -> Option<String> + Send + Sync>;

/// Keeps written documents in a vector.
///
/// A rejection rule can refuse individual documents, and the sink can be
/// switched to unavailable to simulate an outage.
pub struct InMemorySink {
    index_name: String,
    documents: Mutex<Vec<IngestDocument>>,
    index_created: AtomicBool,
    unavailable: AtomicBool,
    reject: Option<RejectFn>,
}

impl InMemorySink {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            documents: Mutex::new(Vec::new()),
            index_created: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
            reject: None,
        }
    }

    /// Refuse documents for which `rule` returns a reason.
    pub fn with_rejection<F>(mut self, rule: F) -> Self
    where
        F: Fn(&IngestDocument) -> Option<String> + Send + Sync + 'static,
    {
        self.reject = Some(Box::new(rule));
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of everything written so far.
    pub fn documents(&self) -> Vec<IngestDocument> {
        self.documents
            .lock()
            .map(|documents| documents.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), SinkError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable(format!(
                "in-memory sink {} is offline",
                self.index_name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn ensure_index(&self) -> Result<bool, SinkError> {
        self.check_available()?;
        Ok(!self.index_created.swap(true, Ordering::SeqCst))
    }

    async fn bulk_write(
        &self,
        documents: Vec<IngestDocument>,
    ) -> Result<BulkWriteReport, SinkError> {
        self.check_available()?;
        let mut stored = self
            .documents
            .lock()
            .map_err(|_| SinkError::BulkWrite("document store poisoned".to_string()))?;

        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents {
            match self.reject.as_ref().and_then(|rule| rule(&document)) {
                Some(reason) => outcomes.push(Some(reason)),
                None => {
                    stored.push(document);
                    outcomes.push(None);
                }
            }
        }
        Ok(BulkWriteReport::from_outcomes(outcomes))
    }

    async fn search_by_user(
        &self,
        user_id: &str,
        size: usize,
    ) -> Result<Vec<IngestDocument>, SinkError> {
        self.check_available()?;
        let mut hits: Vec<IngestDocument> = self
            .documents
            .lock()
            .map_err(|_| SinkError::Search("document store poisoned".to_string()))?
            .iter()
            .filter(|document| document.user_id == user_id)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        hits.truncate(size);
        Ok(hits)
    }
}
