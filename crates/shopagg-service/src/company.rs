//! Company lookups for autocompletion.

use std::sync::Arc;

use async_trait::async_trait;
use shopagg_core::{Company, CoreError, CoreResult};

use crate::storage::{fail, StorageResult};

#[async_trait]
pub trait CompanyStorer: Send + Sync {
    async fn companies_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Company>>;
}

#[derive(Clone)]
pub struct CompanyService {
    companies: Arc<dyn CompanyStorer>,
}

impl CompanyService {
    pub fn new(companies: Arc<dyn CompanyStorer>) -> Self {
        CompanyService { companies }
    }

    pub async fn by_partial_name(&self, prefix: &str) -> CoreResult<Vec<Company>> {
        self.companies
            .companies_by_prefix(prefix)
            .await
            .map_err(fail("companies by partial name", CoreError::SelectCompaniesError))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::MemoryStore;
    use crate::storage::StorageError;

    #[tokio::test]
    async fn test_prefix_search() {
        let mem = MemoryStore::new();
        mem.seed_company("Carrefour");
        mem.seed_company("Casino");
        mem.seed_company("Lidl");

        let found = CompanyService::new(mem.shared()).by_partial_name("Ca").await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_failure() {
        let mem = MemoryStore::new();
        mem.fail_with(StorageError::failed("boom"));
        let err = CompanyService::new(mem.shared()).by_partial_name("Ca").await.unwrap_err();
        assert_eq!(err, CoreError::SelectCompaniesError);
    }
}
