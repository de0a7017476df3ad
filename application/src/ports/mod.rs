//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod document_sink;
pub mod ledger;
pub mod progress;
pub mod record_reader;
pub mod source_scanner;
