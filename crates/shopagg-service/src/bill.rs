//! # Bill Use Case
//!
//! Owns the bill state machine and assembles the composed bill view.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Lifecycle                                    │
//! │                                                                         │
//! │  start_bill(user, store)                                               │
//! │     ├── open bill exists? ──► reuse it (store argument ignored)        │
//! │     └── none ──► insert { amount: "0.0", state: create }               │
//! │                                                                         │
//! │  close_bill(user, bill, amount)                                        │
//! │     ├── no open bill      ──► BillError                                │
//! │     ├── id mismatch       ──► BillError                                │
//! │     └── match ──► { state: complete, amount }                          │
//! │                                                                         │
//! │  cancel_bill(user, bill)                                               │
//! │     ├── no open bill      ──► Ok (nothing to do)                       │
//! │     ├── id mismatch       ──► BillError                                │
//! │     └── match ──► { state: cancel, amount: "0" }                       │
//! │                                                                         │
//! │  complete / cancel are terminal: once left, a bill is no longer the    │
//! │  "unclosed" bill, so every later close/cancel fails the id check.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## View Assembly
//! ```text
//! Bill ──► line items by bill_id ──► store by store_id ──► company by id
//!                                                │
//!                                                ▼
//!                  BillView { bill fields, store + company_name, products }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{
    Bill, BillState, BillStore, BillView, Company, CoreError, CoreResult, Store, UserProduct,
    CANCELLED_BILL_AMOUNT,
};
use tracing::{debug, info, warn};

use crate::storage::{fail, StorageResult};

// =============================================================================
// Storage Contracts
// =============================================================================

/// Bill persistence needed by [`BillService`].
#[async_trait]
pub trait BillStorer: Send + Sync {
    /// Inserts an open bill and returns it with its assigned id.
    ///
    /// If the user already has an open bill, storage returns that bill
    /// instead of creating a second one.
    async fn insert_bill(&self, bill: &Bill) -> StorageResult<Bill>;

    /// Persists `amount` and `state` of an existing bill.
    async fn update_bill(&self, bill: &Bill) -> StorageResult<()>;

    async fn bills_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Bill>>;

    /// The user's bill in state `create`, if any.
    async fn unclosed_bill(&self, user_id: &str) -> StorageResult<Option<Bill>>;
}

#[async_trait]
pub trait BillStoreStorer: Send + Sync {
    async fn store_by_id(&self, store_id: &str) -> StorageResult<Option<Store>>;
}

#[async_trait]
pub trait BillCompanyStorer: Send + Sync {
    async fn company_by_id(&self, company_id: &str) -> StorageResult<Option<Company>>;
}

#[async_trait]
pub trait BillUserProductsStorer: Send + Sync {
    /// Line items of a bill in insertion order.
    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>>;
}

// =============================================================================
// Service
// =============================================================================

/// Bill lifecycle operations.
#[derive(Clone)]
pub struct BillService {
    bills: Arc<dyn BillStorer>,
    stores: Arc<dyn BillStoreStorer>,
    companies: Arc<dyn BillCompanyStorer>,
    items: Arc<dyn BillUserProductsStorer>,
}

impl BillService {
    pub fn new(
        bills: Arc<dyn BillStorer>,
        stores: Arc<dyn BillStoreStorer>,
        companies: Arc<dyn BillCompanyStorer>,
        items: Arc<dyn BillUserProductsStorer>,
    ) -> Self {
        BillService {
            bills,
            stores,
            companies,
            items,
        }
    }

    /// Opens a bill for the user at `store_id`, or returns the bill that is
    /// already open.
    pub async fn start_bill(&self, user_id: &str, store_id: &str) -> CoreResult<BillView> {
        let open = self
            .bills
            .unclosed_bill(user_id)
            .await
            .map_err(fail("start_bill: unclosed bill lookup", CoreError::BillError))?;

        let bill = match open {
            Some(bill) => {
                if bill.store_id != store_id {
                    debug!(
                        bill_id = %bill.bill_id,
                        open_store = %bill.store_id,
                        requested_store = %store_id,
                        "Reusing open bill bound to another store"
                    );
                }
                bill
            }
            None => {
                let bill = self
                    .bills
                    .insert_bill(&Bill::open(user_id, store_id))
                    .await
                    .map_err(fail("start_bill: insert", CoreError::BillError))?;
                info!(bill_id = %bill.bill_id, user_id = %user_id, "Bill started");
                bill
            }
        };

        self.bill_view(bill).await
    }

    /// Completes the user's open bill with its final amount.
    ///
    /// ## Errors
    /// [`CoreError::BillError`] when no bill is open or `bill_id` is not the
    /// open bill.
    pub async fn close_bill(&self, user_id: &str, bill_id: &str, amount: &str) -> CoreResult<()> {
        let mut bill = self
            .open_bill_matching(user_id, bill_id, "close_bill")
            .await?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "Close requested without an open bill");
                CoreError::BillError
            })?;

        bill.state = BillState::Complete;
        bill.amount = amount.to_string();

        self.bills
            .update_bill(&bill)
            .await
            .map_err(fail("close_bill: update", CoreError::BillError))?;

        info!(bill_id = %bill.bill_id, amount = %bill.amount, "Bill closed");
        Ok(())
    }

    /// Cancels the user's open bill. Without an open bill this does nothing.
    pub async fn cancel_bill(&self, user_id: &str, bill_id: &str) -> CoreResult<()> {
        let Some(mut bill) = self.open_bill_matching(user_id, bill_id, "cancel_bill").await? else {
            return Ok(());
        };

        bill.state = BillState::Cancel;
        bill.amount = CANCELLED_BILL_AMOUNT.to_string();

        self.bills
            .update_bill(&bill)
            .await
            .map_err(fail("cancel_bill: update", CoreError::BillError))?;

        info!(bill_id = %bill.bill_id, "Bill cancelled");
        Ok(())
    }

    /// Every bill of the user, without composition.
    pub async fn bills_by_user_id(&self, user_id: &str) -> CoreResult<Vec<Bill>> {
        self.bills
            .bills_by_user_id(user_id)
            .await
            .map_err(fail("bills_by_user_id", CoreError::BillError))
    }

    /// Composed view of the open bill, `None` when the user has none.
    pub async fn last_bill(&self, user_id: &str) -> CoreResult<Option<BillView>> {
        let open = self
            .bills
            .unclosed_bill(user_id)
            .await
            .map_err(fail("last_bill: unclosed bill lookup", CoreError::BillError))?;

        match open {
            Some(bill) => self.bill_view(bill).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetches the open bill and checks it is `bill_id`.
    ///
    /// `Ok(None)` when nothing is open, `BillError` on mismatch.
    async fn open_bill_matching(
        &self,
        user_id: &str,
        bill_id: &str,
        op: &'static str,
    ) -> CoreResult<Option<Bill>> {
        let open = self
            .bills
            .unclosed_bill(user_id)
            .await
            .map_err(fail(op, CoreError::BillError))?;

        match open {
            Some(bill) if bill.bill_id != bill_id => {
                warn!(
                    op,
                    open_bill = %bill.bill_id,
                    requested_bill = %bill_id,
                    "Bill is not the user's open bill"
                );
                Err(CoreError::BillError)
            }
            other => Ok(other),
        }
    }

    /// Joins a bill with its line items, store and company.
    async fn bill_view(&self, bill: Bill) -> CoreResult<BillView> {
        let products = self
            .items
            .user_products_by_bill_id(&bill.bill_id)
            .await
            .map_err(fail("bill_view: line items", CoreError::BillError))?;

        let store = self
            .stores
            .store_by_id(&bill.store_id)
            .await
            .map_err(fail("bill_view: store", CoreError::StoreError))?
            .ok_or_else(|| {
                warn!(
                    bill_id = %bill.bill_id,
                    store_id = %bill.store_id,
                    "Bill references a missing store"
                );
                CoreError::StoreError
            })?;

        let company = self
            .companies
            .company_by_id(&store.company_id)
            .await
            .map_err(fail("bill_view: company", CoreError::StoreError))?;

        Ok(BillView {
            bill_id: bill.bill_id,
            amount: bill.amount,
            state: bill.state,
            store: BillStore {
                store,
                company_name: company.map(|c| c.company_name).unwrap_or_default(),
            },
            products,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::MemoryStore;
    use crate::storage::StorageError;
    use crate::user_product::UserProductStorer;
    use shopagg_core::{NewUserProduct, ProductType};

    fn service(store: &MemoryStore) -> BillService {
        BillService::new(store.shared(), store.shared(), store.shared(), store.shared())
    }

    struct Fixture {
        mem: MemoryStore,
        bills: BillService,
        s1: Store,
        s2: Store,
    }

    fn fixture() -> Fixture {
        let mem = MemoryStore::new();
        let acme = mem.seed_company("Acme");
        let s1 = mem.seed_store(&acme, "Paris", "1 rue A", "75001");
        let s2 = mem.seed_store(&acme, "Lyon", "2 rue B", "69001");
        Fixture {
            bills: service(&mem),
            mem,
            s1,
            s2,
        }
    }

    #[tokio::test]
    async fn test_start_bill_creates_open_bill() {
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();

        assert_eq!(view.amount, "0.0");
        assert_eq!(view.state, BillState::Create);
        assert_eq!(view.store.store, f.s1);
        assert_eq!(view.store.company_name, "Acme");
        assert!(view.products.is_empty());
    }

    #[tokio::test]
    async fn test_start_bill_reuses_open_bill_and_keeps_store() {
        // Scenario A
        let f = fixture();
        let first = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        let second = f.bills.start_bill("u1", &f.s2.store_id).await.unwrap();

        assert_eq!(first.bill_id, second.bill_id);
        assert_eq!(second.store.store.store_id, f.s1.store_id);

        let open: Vec<_> = f
            .mem
            .bills()
            .into_iter()
            .filter(|b| b.user_id == "u1" && b.state == BillState::Create)
            .collect();
        assert_eq!(open.len(), 1);
    }

    #[tokio::test]
    async fn test_bills_are_per_user() {
        let f = fixture();
        let a = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        let b = f.bills.start_bill("u2", &f.s1.store_id).await.unwrap();
        assert_ne!(a.bill_id, b.bill_id);
    }

    #[tokio::test]
    async fn test_close_bill_then_no_last_bill() {
        // Scenario B
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();

        f.bills.close_bill("u1", &view.bill_id, "42.50").await.unwrap();

        let stored = f.mem.bills().into_iter().find(|b| b.bill_id == view.bill_id).unwrap();
        assert_eq!(stored.state, BillState::Complete);
        assert_eq!(stored.amount, "42.50");
        assert!(f.bills.last_bill("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_wrong_bill_changes_nothing() {
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();

        let err = f.bills.close_bill("u1", "someone-else", "10").await.unwrap_err();
        assert_eq!(err, CoreError::BillError);

        let stored = f.mem.bills().into_iter().find(|b| b.bill_id == view.bill_id).unwrap();
        assert_eq!(stored.state, BillState::Create);
        assert_eq!(stored.amount, "0.0");
    }

    #[tokio::test]
    async fn test_close_without_open_bill_fails() {
        let f = fixture();
        let err = f.bills.close_bill("u1", "any", "1").await.unwrap_err();
        assert_eq!(err, CoreError::BillError);
    }

    #[tokio::test]
    async fn test_cancel_without_open_bill_is_noop() {
        let f = fixture();
        f.bills.cancel_bill("u1", "any").await.unwrap();
        assert!(f.mem.bills().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_resets_amount() {
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        f.bills.cancel_bill("u1", &view.bill_id).await.unwrap();

        let stored = f.mem.bills().into_iter().find(|b| b.bill_id == view.bill_id).unwrap();
        assert_eq!(stored.state, BillState::Cancel);
        assert_eq!(stored.amount, "0");
    }

    #[tokio::test]
    async fn test_cancel_wrong_bill_fails() {
        let f = fixture();
        f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        let err = f.bills.cancel_bill("u1", "other").await.unwrap_err();
        assert_eq!(err, CoreError::BillError);
    }

    #[tokio::test]
    async fn test_terminal_bill_cannot_be_mutated() {
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        f.bills.close_bill("u1", &view.bill_id, "5").await.unwrap();

        assert_eq!(
            f.bills.close_bill("u1", &view.bill_id, "99").await.unwrap_err(),
            CoreError::BillError
        );
        // Cancel finds no open bill, so it is a no-op rather than a transition.
        f.bills.cancel_bill("u1", &view.bill_id).await.unwrap();

        let stored = f.mem.bills().into_iter().find(|b| b.bill_id == view.bill_id).unwrap();
        assert_eq!(stored.state, BillState::Complete);
        assert_eq!(stored.amount, "5");
    }

    #[tokio::test]
    async fn test_new_bill_after_close() {
        let f = fixture();
        let first = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        f.bills.close_bill("u1", &first.bill_id, "1").await.unwrap();

        let second = f.bills.start_bill("u1", &f.s2.store_id).await.unwrap();
        assert_ne!(first.bill_id, second.bill_id);
        assert_eq!(second.store.store.store_id, f.s2.store_id);
        assert_eq!(f.bills.bills_by_user_id("u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_last_bill_includes_line_items() {
        let f = fixture();
        let view = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap();
        let product = f.mem.seed_product("111", "Milk", "Farm");
        f.mem
            .insert_user_product(
                &NewUserProduct {
                    product_id: product.product_id.clone(),
                    bill_id: view.bill_id.clone(),
                    price: "1.20".to_string(),
                    quantity: 2,
                    product_type: ProductType::BarcodedProduct,
                    product_size: String::new(),
                    size_format: String::new(),
                },
                "u1",
            )
            .await
            .unwrap();

        let last = f.bills.last_bill("u1").await.unwrap().unwrap();
        assert_eq!(last.products.len(), 1);
        assert_eq!(last.products[0].product_name, "Milk");
        assert_eq!(last.products[0].brand_name, "Farm");
    }

    #[tokio::test]
    async fn test_missing_store_is_store_error() {
        let f = fixture();
        let err = f.bills.start_bill("u1", "no-such-store").await.unwrap_err();
        assert_eq!(err, CoreError::StoreError);
    }

    #[tokio::test]
    async fn test_storage_failure_is_bill_error() {
        let f = fixture();
        f.mem.fail_with(StorageError::failed("database is locked"));
        let err = f.bills.start_bill("u1", &f.s1.store_id).await.unwrap_err();
        assert_eq!(err, CoreError::BillError);
    }

    #[tokio::test]
    async fn test_cancellation_propagates() {
        let f = fixture();
        f.mem.fail_with(StorageError::Canceled);
        assert_eq!(
            f.bills.start_bill("u1", &f.s1.store_id).await.unwrap_err(),
            CoreError::Canceled
        );
        assert_eq!(f.bills.last_bill("u1").await.unwrap_err(), CoreError::Canceled);
        assert_eq!(
            f.bills.cancel_bill("u1", "b").await.unwrap_err(),
            CoreError::Canceled
        );
    }
}
