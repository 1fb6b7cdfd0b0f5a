//! # shopagg-service: Use Cases for Shopagg
//!
//! Every operation a client can trigger, expressed against narrow storage
//! contracts. A use case issues a strict sequence of awaited storage calls,
//! maps each failure to a domain error and never retries.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   apps/api handler                                                      │
//! │        │  primitive args (ids, strings)                                 │
//! │        ▼                                                                │
//! │   ┌───────────────────────────────────────────────────────────────┐    │
//! │   │              ★ shopagg-service (THIS CRATE) ★                 │    │
//! │   │                                                               │    │
//! │   │  BillService ─────────┬─► BillStorer                          │    │
//! │   │                       ├─► BillStoreStorer                     │    │
//! │   │                       ├─► BillCompanyStorer                   │    │
//! │   │                       └─► BillUserProductsStorer              │    │
//! │   │  UserProductService ──► UserProductStorer                     │    │
//! │   │  StoreService ────────┬─► StoreStorer                         │    │
//! │   │                       └─► StoreCompanyStorer                  │    │
//! │   │  ProductService ──────┬─► ProductStorer                       │    │
//! │   │                       └─► ProductBrandStorer                  │    │
//! │   │  BrandService, CompanyService, AuthService, UserService       │    │
//! │   └───────────────────────────────────────────────────────────────┘    │
//! │        │  traits implemented by                                         │
//! │        ▼                                                                │
//! │   shopagg-db repositories (SQLite)                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//! Storers return [`StorageError`]. A use case logs a failed call with its
//! context and answers with the domain error of the operation
//! ([`CoreError::BillError`], [`CoreError::StoreError`], ...).
//! [`StorageError::Canceled`] becomes [`CoreError::Canceled`] untouched.
//!
//! [`CoreError::BillError`]: shopagg_core::CoreError::BillError
//! [`CoreError::StoreError`]: shopagg_core::CoreError::StoreError
//! [`CoreError::Canceled`]: shopagg_core::CoreError::Canceled

pub mod auth;
pub mod bill;
pub mod brand;
pub mod company;
pub mod credentials;
pub mod product;
pub mod storage;
pub mod store;
pub mod user_product;
pub mod users;

#[cfg(test)]
mod fake;

pub use auth::{AuthService, AuthStorer, AuthUserStorer};
pub use bill::{BillCompanyStorer, BillService, BillStoreStorer, BillStorer, BillUserProductsStorer};
pub use brand::{BrandService, BrandStorer};
pub use company::{CompanyService, CompanyStorer};
pub use product::{ProductBrandStorer, ProductService, ProductStorer};
pub use storage::{StorageError, StorageResult};
pub use store::{StoreCompanyStorer, StoreService, StoreStorer};
pub use user_product::{UserProductService, UserProductStorer};
pub use users::{UserService, UsersStorer};
