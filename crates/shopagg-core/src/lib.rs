//! # shopagg-core: Domain Model for Shopagg
//!
//! Pure types and rules shared by every layer of the receipt-aggregation
//! backend. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopagg Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum handlers)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              shopagg-service (use cases)                        │   │
//! │  │   BillService • UserProductService • StoreService • ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopagg-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  catalog  │  │ validation│  │   │
//! │  │   │   Bill    │  │   Money   │  │ bulk ids  │  │   rules   │  │   │
//! │  │   │   Store   │  │  "42.50"  │  │  formats  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  shopagg-db implements the storage contracts declared by the service   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (User, Company, Store, Brand, Product, Bill, UserProduct)
//! - [`money`] - Decimal-string amounts parsed into integer cents
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input rules applied at the HTTP boundary
//! - [`catalog`] - Static initialisation data (store types, bulk products, units)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Amount given to a freshly started bill.
pub const INITIAL_BILL_AMOUNT: &str = "0.0";

/// Amount written to a bill when it is cancelled.
pub const CANCELLED_BILL_AMOUNT: &str = "0";

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Catches typos such as 1000 instead of 10 before they land on a bill.
pub const MAX_ITEM_QUANTITY: i64 = 9999;

/// Length of the opaque session token handed out on login.
pub const AUTH_TOKEN_LENGTH: usize = 128;

/// Fixed product id of the "meat" bulk product.
pub const BULK_PRODUCT_MEAT: &str = "2e30955b-0f88-43df-8924-1ec21afed0aa";

/// Fixed product id of the "vegetable" bulk product.
pub const BULK_PRODUCT_VEGETABLE: &str = "eb5be0d0-b3f6-4f2f-b582-9a7dd566b549";

/// Fixed product id of the "fruit" bulk product.
pub const BULK_PRODUCT_FRUIT: &str = "3c94d3d7-7bce-40d6-8f11-c8fdeb328d41";
