//! Infrastructure layer for chatlog-ingest
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod discovery;
pub mod ledger;
pub mod sink;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileIngestConfig, FileLoggingConfig,
    FileSinkConfig, FileSourceConfig, Severity,
};
pub use discovery::{FsSourceScanner, JsonFileReader, SourceRoot};
pub use ledger::FileLedger;
pub use sink::{ElasticsearchConfig, ElasticsearchSink, InMemorySink};
