//! Application-level configuration.
//!
//! - [`IngestParams`] - run control (batch cap, commit policy)

pub mod ingest_params;

pub use ingest_params::{DEFAULT_MAX_FILES_PER_BATCH, IngestParams};
