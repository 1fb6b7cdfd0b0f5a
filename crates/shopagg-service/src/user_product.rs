//! # Line Items
//!
//! A user product is one line of a bill. Every mutation answers with fresh
//! data read back from storage, never with the request echoed.
//!
//! ```text
//! create ─────────► insert ──► re-fetch joined row ──► UserProduct
//! update_quantity ─► update ──► list of the bill    ──► [UserProduct]
//! delete ──────────► delete ──► owning bill id     ──► list of that bill
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{CoreError, CoreResult, NewUserProduct, QuantityUpdate, UserProduct};
use tracing::{debug, warn};

use crate::storage::{fail, StorageResult};

/// Line-item persistence.
///
/// Reads return rows joined with product, brand, bill and store, in the
/// order they were created.
#[async_trait]
pub trait UserProductStorer: Send + Sync {
    /// Inserts a line item for `user_id` and returns its id.
    async fn insert_user_product(
        &self,
        item: &NewUserProduct,
        user_id: &str,
    ) -> StorageResult<String>;

    async fn user_product_by_id(
        &self,
        user_product_id: &str,
    ) -> StorageResult<Option<UserProduct>>;

    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>>;

    async fn user_products_by_user_id(&self, user_id: &str) -> StorageResult<Vec<UserProduct>>;

    /// Latest line item per product that the user bought at `store_id`.
    async fn recent_user_products_by_store(
        &self,
        user_id: &str,
        store_id: &str,
    ) -> StorageResult<Vec<UserProduct>>;

    async fn update_quantity(&self, update: &QuantityUpdate) -> StorageResult<()>;

    /// Deletes a line item; `Some(bill_id)` of the removed row, `None` when
    /// there was nothing to delete.
    async fn delete_user_product(&self, user_product_id: &str) -> StorageResult<Option<String>>;
}

#[derive(Clone)]
pub struct UserProductService {
    items: Arc<dyn UserProductStorer>,
}

impl UserProductService {
    pub fn new(items: Arc<dyn UserProductStorer>) -> Self {
        UserProductService { items }
    }

    /// Adds a line item and returns it as stored.
    pub async fn create(&self, item: &NewUserProduct, user_id: &str) -> CoreResult<UserProduct> {
        let id = self
            .items
            .insert_user_product(item, user_id)
            .await
            .map_err(fail("user_product create: insert", CoreError::UserProductError))?;

        debug!(user_product_id = %id, bill_id = %item.bill_id, "Line item inserted");

        self.items
            .user_product_by_id(&id)
            .await
            .map_err(fail("user_product create: re-fetch", CoreError::UserProductError))?
            .ok_or_else(|| {
                warn!(user_product_id = %id, "Inserted line item not found on re-fetch");
                CoreError::UserProductError
            })
    }

    pub async fn products_by_bill(&self, bill_id: &str) -> CoreResult<Vec<UserProduct>> {
        self.items
            .user_products_by_bill_id(bill_id)
            .await
            .map_err(fail("products_by_bill", CoreError::UserProductError))
    }

    /// Applies a quantity/size change and returns the bill's refreshed list.
    pub async fn update_quantity(&self, update: &QuantityUpdate) -> CoreResult<Vec<UserProduct>> {
        self.items
            .update_quantity(update)
            .await
            .map_err(fail("update_quantity", CoreError::UserProductError))?;

        self.products_by_bill(&update.bill_id).await
    }

    /// Removes a line item and returns what is left on its bill.
    pub async fn delete_user_product(&self, user_product_id: &str) -> CoreResult<Vec<UserProduct>> {
        let bill_id = self
            .items
            .delete_user_product(user_product_id)
            .await
            .map_err(fail("delete_user_product", CoreError::UserProductError))?
            .ok_or_else(|| {
                debug!(user_product_id = %user_product_id, "Nothing to delete");
                CoreError::UserProductError
            })?;

        self.products_by_bill(&bill_id).await
    }

    /// Purchase history of a user across all bills.
    pub async fn products_by_user(&self, user_id: &str) -> CoreResult<Vec<UserProduct>> {
        self.items
            .user_products_by_user_id(user_id)
            .await
            .map_err(fail("products_by_user", CoreError::UserProductError))
    }

    pub async fn recent_products_by_store(
        &self,
        user_id: &str,
        store_id: &str,
    ) -> CoreResult<Vec<UserProduct>> {
        self.items
            .recent_user_products_by_store(user_id, store_id)
            .await
            .map_err(fail("recent_products_by_store", CoreError::UserProductError))
    }
}
