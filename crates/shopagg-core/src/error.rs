//! # Error Types
//!
//! Domain error taxonomy for Shopagg.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopagg-core errors (this file)                                       │
//! │  ├── CoreError        - What a use case returns                        │
//! │  └── ValidationError  - Input rejected before any use case runs        │
//! │                                                                         │
//! │  shopagg-service                                                       │
//! │  └── StorageError     - What a storer returns (failed / canceled)      │
//! │                                                                         │
//! │  shopagg-db                                                            │
//! │  └── DbError          - sqlx failures with context                     │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - Status code + {"error": text}                  │
//! │                                                                         │
//! │  Flow: DbError → StorageError → CoreError → ApiError → Client          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures never cross the use-case boundary as themselves. They are
//! logged and replaced with the opaque variant that fits the operation. The
//! only exception is [`CoreError::Canceled`], which reports an expired deadline
//! unchanged.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the use-case layer.
///
/// The display text of each variant is the message clients receive.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Unexpected failure in the user subsystem.
    #[error("an error occurred on user")]
    UserError,

    #[error("user not found")]
    UserNotFound,

    /// Login attempted with a wrong password.
    #[error("invalid password")]
    PasswordError,

    /// Password change attempted with a wrong current password.
    #[error("invalid old password")]
    OldPasswordError,

    /// Registration with an email that already has an account.
    #[error("user exist for email {0}")]
    EmailTaken(String),

    /// Registration with a login that already has an account.
    #[error("user exist for login {0}")]
    LoginTaken(String),

    #[error("error brand exists")]
    BrandExists,

    #[error("brand error")]
    BrandError,

    /// Reserved: companies are always resolved with find-or-create.
    #[error("error company exists")]
    CompanyExists,

    #[error("error company error")]
    CompanyError,

    #[error("error on insert company")]
    InsertCompanyError,

    #[error("error on select companies")]
    SelectCompaniesError,

    /// Bill lookup or mutation failed, or the bill is not the user's open bill.
    ///
    /// ## When This Occurs
    /// - Closing/cancelling with an id that is not the unclosed bill
    /// - Closing when no bill is open
    /// - Any storage failure on the bill path
    #[error("bill error")]
    BillError,

    #[error("store error")]
    StoreError,

    #[error("product error")]
    ProductError,

    /// Product lookup by EAN found nothing.
    #[error("product not exists")]
    NotExistsError,

    #[error("user product error")]
    UserProductError,

    /// The storage deadline expired before the call completed.
    #[error("operation canceled")]
    Canceled,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true when the failure is an expired deadline rather than a
    /// business rule.
    pub fn is_canceled(&self) -> bool {
        matches!(self, CoreError::Canceled)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the HTTP boundary before a use case is called.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
