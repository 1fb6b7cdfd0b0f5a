//! In-memory storer used by the use-case tests.
//!
//! One `MemoryStore` implements every storer trait over plain vectors, with
//! the same observable rules as the SQL repositories: unique names and EANs
//! return the existing row, a user has at most one open bill, line items are
//! read back joined and in insertion order.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use shopagg_core::{
    Bill, BillState, Brand, Company, NewUserProduct, Product, ProductType, QuantityUpdate, Store,
    StoreType, User, UserProduct,
};
use uuid::Uuid;

use crate::auth::{AuthStorer, AuthUserStorer};
use crate::bill::{BillCompanyStorer, BillStoreStorer, BillStorer, BillUserProductsStorer};
use crate::brand::BrandStorer;
use crate::company::CompanyStorer;
use crate::product::{ProductBrandStorer, ProductStorer};
use crate::storage::{StorageError, StorageResult};
use crate::store::{StoreCompanyStorer, StoreStorer};
use crate::user_product::UserProductStorer;
use crate::users::UsersStorer;

#[derive(Debug, Clone)]
struct ItemRow {
    user_product_id: String,
    product_id: String,
    user_id: String,
    bill_id: String,
    price: String,
    quantity: i64,
    product_type: ProductType,
    product_size: String,
    size_format: String,
}

#[derive(Debug, Clone)]
struct TokenRow {
    user_id: String,
    token: String,
    active: bool,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    tokens: Vec<TokenRow>,
    companies: Vec<Company>,
    brands: Vec<Brand>,
    stores: Vec<Store>,
    products: Vec<Product>,
    bills: Vec<Bill>,
    items: Vec<ItemRow>,
    failure: Option<StorageError>,
    calls: usize,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    /// Makes every following call fail with `err`.
    pub fn fail_with(&self, err: StorageError) {
        self.lock().failure = Some(err);
    }

    /// Number of storer calls made so far.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn enter(&self) -> StorageResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls += 1;
        match &state.failure {
            Some(err) => Err(err.clone()),
            None => Ok(state),
        }
    }

    // -------------------------------------------------------------------------
    // Seeding helpers
    // -------------------------------------------------------------------------

    pub fn seed_company(&self, name: &str) -> Company {
        let company = Company {
            company_id: new_id(),
            company_name: name.to_string(),
        };
        self.lock().companies.push(company.clone());
        company
    }

    pub fn seed_store(&self, company: &Company, city: &str, address: &str, zip: &str) -> Store {
        let store = Store {
            store_id: new_id(),
            address: address.to_string(),
            zip_code: zip.to_string(),
            city: city.to_string(),
            country: "FR".to_string(),
            store_name: format!("{} {}", company.company_name, city),
            store_type: StoreType::Shop,
            url: String::new(),
            company_id: company.company_id.clone(),
        };
        self.lock().stores.push(store.clone());
        store
    }

    pub fn seed_product(&self, ean: &str, name: &str, brand_name: &str) -> Product {
        let mut state = self.lock();
        let brand = Brand {
            brand_id: new_id(),
            brand_name: brand_name.to_string(),
        };
        state.brands.push(brand.clone());
        let product = Product {
            product_id: new_id(),
            ean: ean.to_string(),
            product_name: name.to_string(),
            brand_id: brand.brand_id,
        };
        state.products.push(product.clone());
        product
    }

    pub fn seed_user(&self, login: &str, email: &str, password_hash: &str) -> User {
        let user = User {
            user_id: new_id(),
            login: login.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        self.lock().users.push(user.clone());
        user
    }

    // -------------------------------------------------------------------------
    // Inspection helpers
    // -------------------------------------------------------------------------

    pub fn bills(&self) -> Vec<Bill> {
        self.lock().bills.clone()
    }

    pub fn stores(&self) -> Vec<Store> {
        self.lock().stores.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn brand_named(&self, name: &str) -> Option<Brand> {
        self.lock().brands.iter().find(|b| b.brand_name == name).cloned()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.lock().users.iter().find(|u| u.user_id == user_id).cloned()
    }

    pub fn active_token(&self, user_id: &str) -> Option<String> {
        self.lock()
            .tokens
            .iter()
            .find(|t| t.user_id == user_id && t.active)
            .map(|t| t.token.clone())
    }
}

impl State {
    fn joined(&self, row: &ItemRow) -> Option<UserProduct> {
        let product = self.products.iter().find(|p| p.product_id == row.product_id)?;
        let brand = self.brands.iter().find(|b| b.brand_id == product.brand_id)?;
        let bill = self.bills.iter().find(|b| b.bill_id == row.bill_id)?;
        let store = self.stores.iter().find(|s| s.store_id == bill.store_id)?;
        Some(UserProduct {
            user_product_id: row.user_product_id.clone(),
            product_id: product.product_id.clone(),
            user_id: row.user_id.clone(),
            product_name: product.product_name.clone(),
            ean: product.ean.clone(),
            brand_id: brand.brand_id.clone(),
            brand_name: brand.brand_name.clone(),
            store_id: store.store_id.clone(),
            store_name: store.store_name.clone(),
            bill_id: bill.bill_id.clone(),
            price: row.price.clone(),
            product_type: row.product_type,
            product_size: row.product_size.clone(),
            size_format: row.size_format.clone(),
            quantity: row.quantity,
        })
    }

    fn items_where(&self, keep: impl Fn(&ItemRow) -> bool) -> Vec<UserProduct> {
        self.items
            .iter()
            .filter(|r| keep(r))
            .filter_map(|r| self.joined(r))
            .collect()
    }

    fn company_named(&mut self, name: &str) -> Company {
        if let Some(c) = self.companies.iter().find(|c| c.company_name == name) {
            return c.clone();
        }
        let company = Company {
            company_id: new_id(),
            company_name: name.to_string(),
        };
        self.companies.push(company.clone());
        company
    }

    fn brand_named(&mut self, name: &str) -> Brand {
        if let Some(b) = self.brands.iter().find(|b| b.brand_name == name) {
            return b.clone();
        }
        let brand = Brand {
            brand_id: new_id(),
            brand_name: name.to_string(),
        };
        self.brands.push(brand.clone());
        brand
    }
}

// =============================================================================
// Bill
// =============================================================================

#[async_trait]
impl BillStorer for MemoryStore {
    async fn insert_bill(&self, bill: &Bill) -> StorageResult<Bill> {
        let mut state = self.enter()?;
        if let Some(open) = state
            .bills
            .iter()
            .find(|b| b.user_id == bill.user_id && b.state == BillState::Create)
        {
            return Ok(open.clone());
        }
        let stored = Bill {
            bill_id: new_id(),
            ..bill.clone()
        };
        state.bills.push(stored.clone());
        Ok(stored)
    }

    async fn update_bill(&self, bill: &Bill) -> StorageResult<()> {
        let mut state = self.enter()?;
        if let Some(row) = state.bills.iter_mut().find(|b| b.bill_id == bill.bill_id) {
            row.amount = bill.amount.clone();
            row.state = bill.state;
        }
        Ok(())
    }

    async fn bills_by_user_id(&self, user_id: &str) -> StorageResult<Vec<Bill>> {
        let state = self.enter()?;
        Ok(state.bills.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }

    async fn unclosed_bill(&self, user_id: &str) -> StorageResult<Option<Bill>> {
        let state = self.enter()?;
        Ok(state
            .bills
            .iter()
            .find(|b| b.user_id == user_id && b.state == BillState::Create)
            .cloned())
    }
}

#[async_trait]
impl BillStoreStorer for MemoryStore {
    async fn store_by_id(&self, store_id: &str) -> StorageResult<Option<Store>> {
        let state = self.enter()?;
        Ok(state.stores.iter().find(|s| s.store_id == store_id).cloned())
    }
}

#[async_trait]
impl BillCompanyStorer for MemoryStore {
    async fn company_by_id(&self, company_id: &str) -> StorageResult<Option<Company>> {
        let state = self.enter()?;
        Ok(state.companies.iter().find(|c| c.company_id == company_id).cloned())
    }
}

#[async_trait]
impl BillUserProductsStorer for MemoryStore {
    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>> {
        let state = self.enter()?;
        Ok(state.items_where(|r| r.bill_id == bill_id))
    }
}

// =============================================================================
// User Product
// =============================================================================

#[async_trait]
impl UserProductStorer for MemoryStore {
    async fn insert_user_product(
        &self,
        item: &NewUserProduct,
        user_id: &str,
    ) -> StorageResult<String> {
        let mut state = self.enter()?;
        let id = new_id();
        state.items.push(ItemRow {
            user_product_id: id.clone(),
            product_id: item.product_id.clone(),
            user_id: user_id.to_string(),
            bill_id: item.bill_id.clone(),
            price: item.price.clone(),
            quantity: item.quantity,
            product_type: item.product_type,
            product_size: item.product_size.clone(),
            size_format: item.size_format.clone(),
        });
        Ok(id)
    }

    async fn user_product_by_id(
        &self,
        user_product_id: &str,
    ) -> StorageResult<Option<UserProduct>> {
        let state = self.enter()?;
        Ok(state
            .items_where(|r| r.user_product_id == user_product_id)
            .into_iter()
            .next())
    }

    async fn user_products_by_bill_id(&self, bill_id: &str) -> StorageResult<Vec<UserProduct>> {
        let state = self.enter()?;
        Ok(state.items_where(|r| r.bill_id == bill_id))
    }

    async fn user_products_by_user_id(&self, user_id: &str) -> StorageResult<Vec<UserProduct>> {
        let state = self.enter()?;
        Ok(state.items_where(|r| r.user_id == user_id))
    }

    async fn recent_user_products_by_store(
        &self,
        user_id: &str,
        store_id: &str,
    ) -> StorageResult<Vec<UserProduct>> {
        let state = self.enter()?;
        let mut latest: Vec<UserProduct> = Vec::new();
        for item in state.items_where(|r| r.user_id == user_id).into_iter().rev() {
            let seen = latest.iter().any(|l| l.product_id == item.product_id);
            if item.store_id == store_id && !seen {
                latest.push(item);
            }
        }
        latest.reverse();
        Ok(latest)
    }

    async fn update_quantity(&self, update: &QuantityUpdate) -> StorageResult<()> {
        let mut state = self.enter()?;
        if let Some(row) = state
            .items
            .iter_mut()
            .find(|r| r.user_product_id == update.user_product_id)
        {
            row.quantity = update.quantity;
            row.product_type = update.product_type;
            row.product_size = update.product_size.clone();
            row.size_format = update.size_format.clone();
        }
        Ok(())
    }

    async fn delete_user_product(&self, user_product_id: &str) -> StorageResult<Option<String>> {
        let mut state = self.enter()?;
        let position = state.items.iter().position(|r| r.user_product_id == user_product_id);
        Ok(position.map(|i| state.items.remove(i).bill_id))
    }
}

// =============================================================================
// Store & Company
// =============================================================================

#[async_trait]
impl StoreStorer for MemoryStore {
    async fn insert_store(&self, store: &Store) -> StorageResult<Store> {
        let mut state = self.enter()?;
        let stored = Store {
            store_id: new_id(),
            ..store.clone()
        };
        state.stores.push(stored.clone());
        Ok(stored)
    }

    async fn search_stores(
        &self,
        store_type: StoreType,
        search: &str,
    ) -> StorageResult<Vec<Store>> {
        let state = self.enter()?;
        Ok(state
            .stores
            .iter()
            .filter(|s| match store_type {
                StoreType::Shop => s.zip_code.starts_with(search),
                StoreType::Web => s.store_type == StoreType::Web && s.store_name.contains(search),
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoreCompanyStorer for MemoryStore {
    async fn company_by_name(&self, name: &str) -> StorageResult<Option<Company>> {
        let state = self.enter()?;
        Ok(state.companies.iter().find(|c| c.company_name == name).cloned())
    }

    async fn insert_company(&self, name: &str) -> StorageResult<Company> {
        let mut state = self.enter()?;
        Ok(state.company_named(name))
    }
}

#[async_trait]
impl CompanyStorer for MemoryStore {
    async fn companies_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Company>> {
        let state = self.enter()?;
        Ok(state
            .companies
            .iter()
            .filter(|c| c.company_name.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Brand & Product
// =============================================================================

#[async_trait]
impl BrandStorer for MemoryStore {
    async fn insert_brand(&self, name: &str) -> StorageResult<Brand> {
        let mut state = self.enter()?;
        Ok(state.brand_named(name))
    }

    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>> {
        let state = self.enter()?;
        Ok(state.brands.iter().find(|b| b.brand_name == name).cloned())
    }

    async fn brands_by_prefix(&self, prefix: &str) -> StorageResult<Vec<Brand>> {
        let state = self.enter()?;
        Ok(state
            .brands
            .iter()
            .filter(|b| b.brand_name.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductBrandStorer for MemoryStore {
    async fn brand_by_name(&self, name: &str) -> StorageResult<Option<Brand>> {
        let state = self.enter()?;
        Ok(state.brands.iter().find(|b| b.brand_name == name).cloned())
    }

    async fn insert_brand(&self, name: &str) -> StorageResult<Brand> {
        let mut state = self.enter()?;
        Ok(state.brand_named(name))
    }
}

#[async_trait]
impl ProductStorer for MemoryStore {
    async fn insert_product(&self, product: &Product) -> StorageResult<Product> {
        let mut state = self.enter()?;
        if let Some(existing) = state.products.iter().find(|p| p.ean == product.ean) {
            return Ok(existing.clone());
        }
        let stored = Product {
            product_id: new_id(),
            ..product.clone()
        };
        state.products.push(stored.clone());
        Ok(stored)
    }

    async fn product_by_ean(&self, ean: &str) -> StorageResult<Option<Product>> {
        let state = self.enter()?;
        Ok(state.products.iter().find(|p| p.ean == ean).cloned())
    }
}

// =============================================================================
// Users & Auth
// =============================================================================

#[async_trait]
impl UsersStorer for MemoryStore {
    async fn upsert_user(&self, user: &User) -> StorageResult<()> {
        let mut state = self.enter()?;
        if let Some(existing) = state.users.iter_mut().find(|u| u.login == user.login) {
            existing.email = user.email.clone();
            return Ok(());
        }
        state.users.push(User {
            user_id: new_id(),
            ..user.clone()
        });
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let state = self.enter()?;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>> {
        let state = self.enter()?;
        Ok(state.users.iter().find(|u| u.login == login).cloned())
    }

    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>> {
        let state = self.enter()?;
        Ok(state.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> StorageResult<()> {
        let mut state = self.enter()?;
        if let Some(u) = state.users.iter_mut().find(|u| u.user_id == user_id) {
            u.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn update_email(&self, user_id: &str, email: &str) -> StorageResult<()> {
        let mut state = self.enter()?;
        if let Some(u) = state.users.iter_mut().find(|u| u.user_id == user_id) {
            u.email = email.to_string();
        }
        Ok(())
    }
}

#[async_trait]
impl AuthUserStorer for MemoryStore {
    async fn user_by_login(&self, login: &str) -> StorageResult<Option<User>> {
        let state = self.enter()?;
        Ok(state.users.iter().find(|u| u.login == login).cloned())
    }
}

#[async_trait]
impl AuthStorer for MemoryStore {
    async fn upsert_token(&self, user_id: &str, token: &str) -> StorageResult<()> {
        let mut state = self.enter()?;
        state.tokens.retain(|t| t.user_id != user_id);
        state.tokens.push(TokenRow {
            user_id: user_id.to_string(),
            token: token.to_string(),
            active: true,
        });
        Ok(())
    }

    async fn deactivate_token(&self, user_id: &str) -> StorageResult<()> {
        let mut state = self.enter()?;
        for t in state.tokens.iter_mut().filter(|t| t.user_id == user_id) {
            t.active = false;
        }
        Ok(())
    }

    async fn user_id_by_token(&self, token: &str) -> StorageResult<Option<String>> {
        let state = self.enter()?;
        Ok(state
            .tokens
            .iter()
            .find(|t| t.token == token && t.active)
            .map(|t| t.user_id.clone()))
    }
}
