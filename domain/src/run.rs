//! Pipeline run state and results.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phases of one ingestion run.
///
/// A run moves `Idle -> Discovering -> Extracting -> Writing -> Committing`
/// and always ends back in `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Idle,
    Discovering,
    Extracting,
    Writing,
    Committing,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Discovering => "discovering",
            RunPhase::Extracting => "extracting",
            RunPhase::Writing => "writing",
            RunPhase::Committing => "committing",
        }
    }

    /// Phases that may legally follow this one.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Idle, Discovering)
                | (Discovering, Extracting)
                | (Extracting, Writing)
                | (Writing, Committing)
                | (_, Idle)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which files are recorded in the ledger after the write step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Every file that produced a document, whatever the sink said.
    #[default]
    Extracted,
    /// Only files whose document the sink accepted.
    Acknowledged,
}

impl CommitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitPolicy::Extracted => "extracted",
            CommitPolicy::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommitPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extracted" => Ok(CommitPolicy::Extracted),
            "acknowledged" => Ok(CommitPolicy::Acknowledged),
            other => Err(DomainError::InvalidCommitPolicy(other.to_string())),
        }
    }
}

/// Outcome of one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files selected by discovery for this run.
    pub files_considered: usize,
    pub documents_assembled: usize,
    /// Documents the sink accepted.
    pub documents_written: usize,
    pub documents_failed: usize,
    /// Files that could not be read or parsed. Left out of the ledger.
    pub files_failed: usize,
    pub files_committed: usize,
    pub missing_roots: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_error: Option<String>,
}

impl RunSummary {
    /// True when discovery found nothing to do.
    pub fn is_noop(&self) -> bool {
        self.files_considered == 0
    }

    pub fn write_failed(&self) -> bool {
        self.write_error.is_some()
    }
}
