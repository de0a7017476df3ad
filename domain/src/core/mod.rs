//! Core domain concepts shared across all subdomains.
//!
//! - [`record::RawRecord`] - one parsed log file, read-only
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod record;
