//! # Company Repository
//!
//! Company names are unique. Inserting a name that already exists returns
//! the stored row, so two concurrent "create or get" calls end up with the
//! same company.

use std::time::Duration;

use async_trait::async_trait;
use shopagg_core::Company;
use shopagg_service::{BillCompanyStorer, CompanyStorer, StorageResult, StoreCompanyStorer};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::timed;

#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        CompanyRepository { pool, query_timeout }
    }

    pub async fn insert_company(&self, name: &str) -> DbResult<Company> {
        debug!(company_name = %name, "Inserting company");

        timed(
            self.query_timeout,
            sqlx::query_as::<_, Company>(
                r#"
                INSERT INTO company (company_id, company_name)
                VALUES (?1, ?2)
                ON CONFLICT(company_name) DO UPDATE SET company_name = excluded.company_name
                RETURNING company_id, company_name
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn company_by_name(&self, name: &str) -> DbResult<Option<Company>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Company>(
                "SELECT company_id, company_name FROM company WHERE company_name = ?1",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn company_by_id(&self, company_id: &str) -> DbResult<Option<Company>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Company>(
                "SELECT company_id, company_name FROM company WHERE company_id = ?1",
            )
            .bind(company_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Case-sensitive prefix match, ordered by name.
    pub async fn companies_by_prefix(&self, prefix: &str) -> DbResult<Vec<Company>> {
        timed(
            self.query_timeout,
            sqlx::query_as::<_, Company>(
                r#"
                SELECT company_id, company_name
                FROM company
                WHERE substr(company_name, 1, length(?1)) = ?1
                ORDER BY company_name
                "#,
            )
            .bind(prefix)
            .fetch_all(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl CompanyStorer for CompanyRepository {
    async fn companies_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Company>> {
        Ok(self.companies_by_prefix(prefix).await?)
    }
}

#[async_trait]
impl StoreCompanyStorer for CompanyRepository {
    async fn company_by_name(&self, name: &str) -> StorageResult<Option<Company>> {
        Ok(self.company_by_name(name).await?)
    }

    async fn insert_company(&self, name: &str) -> StorageResult<Company> {
        Ok(self.insert_company(name).await?)
    }
}

#[async_trait]
impl BillCompanyStorer for CompanyRepository {
    async fn company_by_id(&self, company_id: &str) -> StorageResult<Option<Company>> {
        Ok(self.company_by_id(company_id).await?)
    }
}
