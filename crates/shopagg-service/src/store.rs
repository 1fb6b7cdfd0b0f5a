//! # Store Reconciliation
//!
//! Stores are never duplicated by the client: creating a store first
//! resolves the operating company by name, then looks for an equivalent
//! store before inserting.
//!
//! ```text
//! create_store(store, company_name)
//!    │
//!    ├─► create_or_get_company(company_name)
//!    ├─► search candidates
//!    │      shop: zip code prefix
//!    │      web:  name substring among web stores
//!    ├─► candidate with same company + city + address? ──► return it
//!    └─► insert
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{Company, CoreError, CoreResult, NewStore, Store, StoreType};
use tracing::{debug, info};

use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait StoreStorer: Send + Sync {
    async fn insert_store(&self, store: &Store) -> StorageResult<Store>;

    /// Shop search matches the zip code prefix across stores; web search
    /// matches a substring of the name among web stores.
    async fn search_stores(&self, store_type: StoreType, search: &str) -> StorageResult<Vec<Store>>;
}

#[async_trait]
pub trait StoreCompanyStorer: Send + Sync {
    async fn company_by_name(&self, name: &str) -> StorageResult<Option<Company>>;

    /// Inserts a company; if the name already exists the stored row comes back.
    async fn insert_company(&self, name: &str) -> StorageResult<Company>;
}

#[derive(Clone)]
pub struct StoreService {
    stores: Arc<dyn StoreStorer>,
    companies: Arc<dyn StoreCompanyStorer>,
}

impl StoreService {
    pub fn new(stores: Arc<dyn StoreStorer>, companies: Arc<dyn StoreCompanyStorer>) -> Self {
        StoreService { stores, companies }
    }

    /// Company with exactly `name`, created when absent.
    pub async fn create_or_get_company(&self, name: &str) -> CoreResult<Company> {
        let found = self
            .companies
            .company_by_name(name)
            .await
            .map_err(fail("create_or_get_company: lookup", CoreError::CompanyError))?;

        if let Some(company) = found {
            return Ok(company);
        }

        let company = self
            .companies
            .insert_company(name)
            .await
            .map_err(fail("create_or_get_company: insert", CoreError::InsertCompanyError))?;

        info!(company_id = %company.company_id, company_name = %name, "Company created");
        Ok(company)
    }

    /// Returns the equivalent existing store or inserts `store`.
    ///
    /// `store` is expected already normalized for its type.
    pub async fn create_store(&self, store: NewStore, company_name: &str) -> CoreResult<Store> {
        let company = self.create_or_get_company(company_name).await?;

        let candidates = self
            .stores
            .search_stores(store.store_type, store.search_key())
            .await
            .map_err(fail("create_store: candidate search", CoreError::StoreError))?;

        let store = store.into_store(company.company_id);

        if let Some(existing) = candidates.into_iter().find(|c| c.is_same_location(&store)) {
            debug!(store_id = %existing.store_id, "Store already known");
            return Ok(existing);
        }

        let created = self
            .stores
            .insert_store(&store)
            .await
            .map_err(fail("create_store: insert", CoreError::StoreError))?;

        info!(store_id = %created.store_id, store_type = %created.store_type, "Store created");
        Ok(created)
    }

    pub async fn stores_by_zip_code_or_name(
        &self,
        store_type: StoreType,
        search: &str,
    ) -> CoreResult<Vec<Store>> {
        self.stores
            .search_stores(store_type, search)
            .await
            .map_err(fail("stores_by_zip_code_or_name", CoreError::StoreError))
    }
}
