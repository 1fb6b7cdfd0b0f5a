//! # shopagg-db: Database Layer for Shopagg
//!
//! SQLite storage for accounts, the catalogue and purchases, exposed as
//! repositories that implement the storer traits of `shopagg-service`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopagg Data Flow                                │
//! │                                                                         │
//! │  HTTP handler ──► BillService::start_bill                              │
//! │                        │  Arc<dyn BillStorer>                           │
//! │                        ▼                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shopagg-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ BillRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StoreRepo     │    │ 001_initial  │  │   │
//! │  │   │ query timeout │    │ UserProduct.. │    │   _schema    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (shopagg.db)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopagg_db::{Database, DbConfig};
//! use shopagg_service::BillService;
//!
//! let db = Database::new(DbConfig::new("./shopagg.db")).await?;
//!
//! let bills = BillService::new(
//!     Arc::new(db.bills()),
//!     Arc::new(db.stores()),
//!     Arc::new(db.companies()),
//!     Arc::new(db.user_products()),
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::auth::AuthRepository;
pub use repository::bill::BillRepository;
pub use repository::brand::BrandRepository;
pub use repository::company::CompanyRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
pub use repository::user::UserRepository;
pub use repository::user_product::UserProductRepository;
