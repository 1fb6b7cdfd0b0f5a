//! # Validation Module
//!
//! Input rules applied by the HTTP layer before a use case runs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Field presence and JSON types                                     │
//! │  └── Enum values (store_type, product_type)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Identifiers are UUIDs                                             │
//! │  ├── Amounts/prices are non-negative decimals                          │
//! │  ├── Quantities are positive                                           │
//! │  └── Store fields match the store type                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints (login, email, names, EAN)                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewStore, StoreType};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty (or whitespace-only) values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a name-like field (login, brand, company, product).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    validate_required(field, value)?;

    if value.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Minimal email shape check: something, `@`, something with a dot.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::invalid_format("email", "expected name@domain"));
    }
    Ok(())
}

/// Validates that an identifier is a UUID and returns its canonical
/// (lowercase, hyphenated) form.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<String> {
    Uuid::parse_str(id.trim())
        .map(|u| u.to_string())
        .map_err(|_| ValidationError::invalid_format(field, "must be a valid UUID"))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a decimal-string amount (bill amount or line price).
///
/// ## Rules
/// - Parses as [`Money`], any number of decimals ("1.995" is fine)
/// - Zero is allowed, negative is not
pub fn validate_amount(field: &str, raw: &str) -> ValidationResult<()> {
    let money = Money::parse(raw).map_err(|e| match e {
        ValidationError::InvalidFormat { reason, .. } => {
            ValidationError::invalid_format(field, reason)
        }
        other => other,
    })?;

    if money.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Store Validators
// =============================================================================

/// Checks and normalizes a store registration.
///
/// ## Rules
/// ```text
/// shop ──► address, zip_code, country, city required; url cleared
/// web  ──► url required; url becomes store_name; location fields cleared
/// ```
pub fn normalize_new_store(mut store: NewStore) -> ValidationResult<NewStore> {
    match store.store_type {
        StoreType::Shop => {
            validate_required("address", &store.address)?;
            validate_required("zip_code", &store.zip_code)?;
            validate_required("country", &store.country)?;
            validate_required("city", &store.city)?;
            store.url.clear();
        }
        StoreType::Web => {
            validate_required("url", &store.url)?;
            store.address.clear();
            store.zip_code.clear();
            store.country.clear();
            store.city.clear();
            store.store_name = store.url.clone();
        }
    }
    Ok(store)
}

// =============================================================================
// Unit Tests
// =============================================================================
