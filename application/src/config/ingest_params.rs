//! Ingestion parameters - run control.
//!
//! [`IngestParams`] groups the static parameters that control one run of
//! [`RunIngestionUseCase`](crate::use_cases::run_ingestion::RunIngestionUseCase).

use chatlog_domain::CommitPolicy;
use serde::{Deserialize, Serialize};

/// Default cap on files selected per run.
pub const DEFAULT_MAX_FILES_PER_BATCH: usize = 100;

/// Run control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestParams {
    /// Maximum files selected per run. Zero means unlimited.
    pub max_files_per_batch: usize,
    /// Which files get recorded in the ledger after the write step.
    pub commit_policy: CommitPolicy,
}

impl Default for IngestParams {
    fn default() -> Self {
        Self {
            max_files_per_batch: DEFAULT_MAX_FILES_PER_BATCH,
            commit_policy: CommitPolicy::default(),
        }
    }
}

impl IngestParams {
    // ==================== Builder Methods ====================

    pub fn with_max_files_per_batch(mut self, max: usize) -> Self {
        self.max_files_per_batch = max;
        self
    }

    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = IngestParams::default();
        assert_eq!(params.max_files_per_batch, 100);
        assert_eq!(params.commit_policy, CommitPolicy::Extracted);
    }

    #[test]
    fn test_builder() {
        let params = IngestParams::default()
            .with_max_files_per_batch(0)
            .with_commit_policy(CommitPolicy::Acknowledged);
        assert_eq!(params.max_files_per_batch, 0);
        assert_eq!(params.commit_policy, CommitPolicy::Acknowledged);
    }
}
