//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Log record must be a JSON object, found {0}")]
    RecordNotObject(&'static str),

    #[error("Invalid commit policy: {0} (expected 'extracted' or 'acknowledged')")]
    InvalidCommitPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_object_display() {
        let error = DomainError::RecordNotObject("array");
        assert_eq!(
            error.to_string(),
            "Log record must be a JSON object, found array"
        );
    }

    #[test]
    fn test_invalid_commit_policy_display() {
        let error = DomainError::InvalidCommitPolicy("never".to_string());
        assert!(error.to_string().contains("never"));
    }
}
