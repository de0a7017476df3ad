//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_ingestion;
pub(crate) mod shared;
