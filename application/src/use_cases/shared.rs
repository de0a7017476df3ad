//! Shared utilities for use cases.

use crate::use_cases::run_ingestion::RunIngestionError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunIngestionError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunIngestionError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunIngestionError::Cancelled);
    }
    Ok(())
}
