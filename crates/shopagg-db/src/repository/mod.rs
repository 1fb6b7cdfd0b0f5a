//! # Repository Module
//!
//! One repository per table. Each keeps inherent methods returning
//! [`DbResult`](crate::DbResult) and implements the storer traits of
//! `shopagg-service` on top of them.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillService                                                            │
//! │       │  Arc<dyn BillStoreStorer>::store_by_id(id)                      │
//! │       ▼                                                                 │
//! │  impl BillStoreStorer for StoreRepository                               │
//! │       │  Ok(self.store_by_id(id).await?)     DbError → StorageError     │
//! │       ▼                                                                 │
//! │  StoreRepository::store_by_id  (inherent, SQL under query timeout)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! | Repository                | Storer traits                                   |
//! |---------------------------|-------------------------------------------------|
//! | [`UserRepository`]        | `UsersStorer`, `AuthUserStorer`                 |
//! | [`AuthRepository`]        | `AuthStorer`                                    |
//! | [`BrandRepository`]       | `BrandStorer`, `ProductBrandStorer`             |
//! | [`CompanyRepository`]     | `CompanyStorer`, `StoreCompanyStorer`, `BillCompanyStorer` |
//! | [`StoreRepository`]       | `StoreStorer`, `BillStoreStorer`                |
//! | [`ProductRepository`]     | `ProductStorer`                                 |
//! | [`BillRepository`]        | `BillStorer`                                    |
//! | [`UserProductRepository`] | `UserProductStorer`, `BillUserProductsStorer`   |

pub mod auth;
pub mod bill;
pub mod brand;
pub mod company;
pub mod product;
pub mod store;
pub mod user;
pub mod user_product;

pub use auth::AuthRepository;
pub use bill::BillRepository;
pub use brand::BrandRepository;
pub use company::CompanyRepository;
pub use product::ProductRepository;
pub use store::StoreRepository;
pub use user::UserRepository;
pub use user_product::UserProductRepository;
