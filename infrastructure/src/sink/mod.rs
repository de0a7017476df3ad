//! Document sink adapters
//!
//! - [`ElasticsearchSink`] - HTTP client for an Elasticsearch cluster
//! - [`InMemorySink`] - process-local store for dry runs and tests

mod elasticsearch;
pub mod mapping;
mod memory;

pub use elasticsearch::{ElasticsearchConfig, ElasticsearchSink};
pub use memory::InMemorySink;
