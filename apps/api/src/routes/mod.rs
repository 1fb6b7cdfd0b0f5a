//! # HTTP Routes
//!
//! ## Route Map
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │ public                                                                   │
//! │   GET  /health  GET /init  POST /create-user  POST /login                │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │ behind require_token                                                     │
//! │   /user          get · logout · reset-password · update-email            │
//! │   /brand         get/{name} · create                                     │
//! │   /company       get/{name}                                              │
//! │   /bill          get-all · get-last · start · stop · cancel              │
//! │   /store         get/{store_type}/{search} · create-store                │
//! │   /product       get/{ean} · create-product                              │
//! │   /user-product  get-bill-id/{bill_id} · get-all · recent/{store_id}     │
//! │                  create-user-product · quantity · delete/{id}            │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Successful answers use the envelope `{"message": ..., "data": ...}`.

pub mod bill;
pub mod brand;
pub mod company;
pub mod init;
pub mod product;
pub mod store;
pub mod user;
pub mod user_product;

use axum::Json;
use serde::Serialize;

/// Success envelope shared by every JSON route.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub data: T,
}

pub(crate) fn reply<T: Serialize>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope { message, data })
}
