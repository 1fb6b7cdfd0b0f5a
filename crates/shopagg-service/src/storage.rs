//! # Storage Contract Errors
//!
//! What every storer call can fail with, and how a use case turns that into
//! a domain error.
//!
//! ```text
//! StorageError::Failed(reason) ──log──► mapped domain error (BillError, ...)
//! StorageError::Canceled       ───────► CoreError::Canceled
//! ```

use shopagg_core::CoreError;
use thiserror::Error;
use tracing::error;

/// Failure of a single storer call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The call's deadline expired before storage answered.
    #[error("storage call canceled")]
    Canceled,

    /// Transport, constraint or query failure.
    #[error("storage failure: {0}")]
    Failed(String),
}

impl StorageError {
    pub fn failed(reason: impl Into<String>) -> Self {
        StorageError::Failed(reason.into())
    }
}

/// Result type of every storer method.
pub type StorageResult<T> = Result<T, StorageError>;

/// Builds the `map_err` closure for a storer call.
///
/// `context` names the call site in the log line; `mapped` is what the
/// caller of the use case sees.
///
/// ## Example
/// ```rust,ignore
/// let bill = self.bills
///     .unclosed_bill(user_id)
///     .await
///     .map_err(fail("start_bill: unclosed bill lookup", CoreError::BillError))?;
/// ```
pub(crate) fn fail(
    context: &'static str,
    mapped: CoreError,
) -> impl FnOnce(StorageError) -> CoreError {
    move |err| match err {
        StorageError::Canceled => CoreError::Canceled,
        StorageError::Failed(reason) => {
            error!(context, %reason, "Storage call failed");
            mapped
        }
    }
}
