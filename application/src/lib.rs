//! Application layer for chatlog-ingest
//!
//! This crate contains the ingestion use case, the ports it drives, and
//! run parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MAX_FILES_PER_BATCH, IngestParams};
pub use ports::{
    document_sink::{BulkWriteReport, DocumentSink, SinkError},
    ledger::{DedupLedger, InMemoryLedger, LedgerError},
    progress::{NoRunProgress, RunProgressNotifier},
    record_reader::{ReadError, RecordReader},
    source_scanner::{DiscoveryError, DiscoveryReport, SourceScanner},
};
pub use use_cases::run_ingestion::{RunIngestionError, RunIngestionUseCase};
