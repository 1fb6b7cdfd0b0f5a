//! # Domain Types
//!
//! Records shared by the service, storage and HTTP layers.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────┐      ┌───────────┐      ┌───────────┐                   │
//! │  │  Company  │ 1──* │   Store   │ 1──* │   Bill    │ *──1  User        │
//! │  │  name ◆   │      │ shop/web  │      │  state    │                   │
//! │  └───────────┘      └───────────┘      │  amount   │                   │
//! │                                        └─────┬─────┘                   │
//! │                                              │ 1                        │
//! │  ┌───────────┐      ┌───────────┐            │ *                        │
//! │  │   Brand   │ 1──* │  Product  │ 1──* ┌─────┴───────┐                 │
//! │  │  name ◆   │      │  ean ◆    │      │ UserProduct │                 │
//! │  └───────────┘      └───────────┘      │ price, qty  │                 │
//! │                                        └─────────────┘                 │
//! │                                                                         │
//! │  ◆ = unique business key used by find-or-create                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are UUID v4 strings. Amounts and prices stay decimal strings
//! end to end (see [`crate::money`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Bill State
// =============================================================================

/// Lifecycle state of a bill.
///
/// ```text
///            close
///   create ─────────► complete
///      │
///      │ cancel
///      ▼
///   cancel
/// ```
/// `complete` and `cancel` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum BillState {
    /// The open ("unclosed") bill. At most one per user.
    #[default]
    Create,
    Complete,
    Cancel,
}

impl BillState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillState::Create => "create",
            BillState::Complete => "complete",
            BillState::Cancel => "cancel",
        }
    }

    /// Returns true if no transition can leave this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BillState::Create)
    }
}

impl fmt::Display for BillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Store Type
// =============================================================================

/// Physical shop or web store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Shop,
    Web,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Shop => "shop",
            StoreType::Web => "web",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shop" => Ok(StoreType::Shop),
            "web" => Ok(StoreType::Web),
            _ => Err(ValidationError::NotAllowed {
                field: "store_type".to_string(),
                allowed: vec!["shop".to_string(), "web".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product Type
// =============================================================================

/// How a line item is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Weighed or measured produce, identified by a fixed bulk product id.
    BulkProduct,
    /// Product scanned by its EAN.
    BarcodedProduct,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::BulkProduct => "bulk_product",
            ProductType::BarcodedProduct => "barcoded_product",
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: String,
    pub login: String,
    pub email: String,

    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

// =============================================================================
// Company & Brand
// =============================================================================

/// Legal entity operating stores. `company_name` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Company {
    pub company_id: String,
    pub company_name: String,
}

/// Product brand. `brand_name` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    pub brand_id: String,
    pub brand_name: String,
}

// =============================================================================
// Store
// =============================================================================

/// A shop or web store belonging to one company.
///
/// Web stores keep their URL in `store_name` and leave the location fields
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub store_id: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
    pub store_name: String,
    pub store_type: StoreType,
    pub url: String,
    pub company_id: String,
}

impl Store {
    /// Store equality used to avoid registering the same store twice:
    /// same company, same city, same address.
    ///
    /// Web stores have empty city and address, so any two web stores of a
    /// company compare equal here.
    pub fn is_same_location(&self, other: &Store) -> bool {
        self.company_id == other.company_id
            && self.city == other.city
            && self.address == other.address
    }
}

/// Store fields supplied by a client, before the company is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStore {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub store_name: String,
    pub store_type: StoreType,
    #[serde(default)]
    pub url: String,
}

impl NewStore {
    /// Binds the store to a company, producing a record ready to insert.
    /// The id is assigned by storage.
    pub fn into_store(self, company_id: impl Into<String>) -> Store {
        Store {
            store_id: String::new(),
            address: self.address,
            zip_code: self.zip_code,
            city: self.city,
            country: self.country,
            store_name: self.store_name,
            store_type: self.store_type,
            url: self.url,
            company_id: company_id.into(),
        }
    }

    /// The search term used to find candidate duplicates: the zip code for
    /// shops, the store name for web stores.
    pub fn search_key(&self) -> &str {
        match self.store_type {
            StoreType::Shop => &self.zip_code,
            StoreType::Web => &self.store_name,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product identified by its EAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: String,
    pub ean: String,
    pub product_name: String,
    pub brand_id: String,
}

// =============================================================================
// Bill
// =============================================================================

/// One shopping trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bill {
    pub bill_id: String,
    pub user_id: String,
    pub store_id: String,
    /// Decimal string, e.g. "42.50".
    pub amount: String,
    pub state: BillState,
}

impl Bill {
    /// A new open bill for `user_id` at `store_id`. The id is assigned by
    /// storage.
    pub fn open(user_id: impl Into<String>, store_id: impl Into<String>) -> Self {
        Bill {
            bill_id: String::new(),
            user_id: user_id.into(),
            store_id: store_id.into(),
            amount: crate::INITIAL_BILL_AMOUNT.to_string(),
            state: BillState::Create,
        }
    }
}

/// Store section of a [`BillView`]: the store plus its company's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillStore {
    #[serde(flatten)]
    pub store: Store,
    pub company_name: String,
}

/// A bill joined with its store, company and line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillView {
    pub bill_id: String,
    pub amount: String,
    pub state: BillState,
    pub store: BillStore,
    pub products: Vec<UserProduct>,
}

// =============================================================================
// User Product
// =============================================================================

/// A line item as read back from storage, denormalized with product, brand
/// and store names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserProduct {
    pub user_product_id: String,
    pub product_id: String,
    pub user_id: String,
    pub product_name: String,
    pub ean: String,
    pub brand_id: String,
    pub brand_name: String,
    pub store_id: String,
    pub store_name: String,
    pub bill_id: String,
    /// Decimal string.
    pub price: String,
    pub product_type: ProductType,
    pub product_size: String,
    pub size_format: String,
    pub quantity: i64,
}

/// A line item as written by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserProduct {
    pub product_id: String,
    pub bill_id: String,
    pub price: String,
    pub quantity: i64,
    pub product_type: ProductType,
    #[serde(default)]
    pub product_size: String,
    #[serde(default)]
    pub size_format: String,
}

/// New quantity (and measurement) for an existing line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub bill_id: String,
    pub user_product_id: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub product_size: String,
    #[serde(default)]
    pub size_format: String,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
