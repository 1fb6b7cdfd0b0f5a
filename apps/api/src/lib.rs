//! # Shopagg API
//!
//! HTTP server for the receipt-aggregation backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Server                                    │
//! │                                                                         │
//! │  request ──► CorsLayer ──► TraceLayer ──► Router                       │
//! │                                             │                           │
//! │                     public routes ◄─────────┤                           │
//! │                                             ▼                           │
//! │                                       require_token                     │
//! │                                             │ CurrentUser               │
//! │                                             ▼                           │
//! │                                   handler ──► AppState service          │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                          shopagg-db repositories        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Loaded by [`ApiConfig::load`]. Environment variables:
//! - `SHOPAGG_CONFIG` - TOML file (default: ./shopagg.toml)
//! - `SHOPAGG_HOST` / `SHOPAGG_PORT` - bind address (default: 0.0.0.0:8080)
//! - `SHOPAGG_DATABASE_PATH` - SQLite file (default: ./shopagg.db)
//! - `SHOPAGG_MAX_CONNECTIONS` - pool size (default: 5)
//! - `SHOPAGG_QUERY_TIMEOUT_SECS` - storage deadline (default: 10)
//! - `RUST_LOG` - log filter (default: info)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{middleware, Router};
use shopagg_db::Database;
use shopagg_service::{
    AuthService, BillService, BrandService, CompanyService, ProductService, StoreService,
    UserProductService, UserService,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// Shared application state.
///
/// Every service is wired to repositories over the same pool. Cloning is
/// cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub users: UserService,
    pub bills: BillService,
    pub user_products: UserProductService,
    pub stores: StoreService,
    pub companies: CompanyService,
    pub brands: BrandService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let users = Arc::new(db.users());
        let companies = Arc::new(db.companies());
        let stores = Arc::new(db.stores());
        let brands = Arc::new(db.brands());
        let user_products = Arc::new(db.user_products());

        AppState {
            auth: AuthService::new(Arc::new(db.auth()), users.clone()),
            users: UserService::new(users),
            bills: BillService::new(
                Arc::new(db.bills()),
                stores.clone(),
                companies.clone(),
                user_products.clone(),
            ),
            user_products: UserProductService::new(user_products),
            stores: StoreService::new(stores, companies.clone()),
            companies: CompanyService::new(companies),
            brands: BrandService::new(brands.clone()),
            products: ProductService::new(Arc::new(db.products()), brands),
            db,
        }
    }
}

/// Builds the full router: public routes, token-protected routes and the
/// tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::user::routes())
        .merge(routes::brand::routes())
        .merge(routes::company::routes())
        .merge(routes::bill::routes())
        .merge(routes::store::routes())
        .merge(routes::product::routes())
        .merge(routes::user_product::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(routes::init::routes())
        .merge(routes::user::public_routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
