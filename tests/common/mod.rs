#![allow(dead_code)]

use async_trait::async_trait;
use franchise_catalog::adapters::memory::{InMemoryStore, StoreStats};
use franchise_catalog::core::catalog::Catalog;
use franchise_catalog::domain::model::{
    Branch, BranchProduct, BranchProductRequest, BranchRequest, Franchise, FranchiseRequest,
    NewBranch, NewBranchProduct, NewFranchise, NewProduct, Product, ProductRequest, TopStockRow,
};
use franchise_catalog::domain::ports::{
    BranchProductRepository, BranchRepository, CatalogStore, FranchiseRepository, ProductRepository,
    ReportingQuery, SaveOutcome, StoreError, StoreResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Wraps the in-memory store so tests can force the paths a real backend
/// only reaches under contention or outage.
#[derive(Clone, Default)]
pub struct TestStore {
    pub inner: InMemoryStore,
    blind_prechecks: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existence checks report `false`, so only the store constraint can
    /// reject a duplicate. Mimics two writers passing the check together.
    pub fn blind_prechecks(&self, on: bool) {
        self.blind_prechecks.store(on, Ordering::SeqCst);
    }

    /// Every call fails with `StoreError::Unavailable`.
    pub fn go_down(&self, on: bool) {
        self.unavailable.store(on, Ordering::SeqCst);
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.stats()
    }

    pub fn reset_stats(&self) {
        self.inner.reset_stats()
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    async fn exists(&self, answer: impl std::future::Future<Output = StoreResult<bool>>) -> StoreResult<bool> {
        self.check()?;
        let found = answer.await?;
        Ok(found && !self.blind_prechecks.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl FranchiseRepository for TestStore {
    async fn get_franchise(&self, id: i64) -> StoreResult<Option<Franchise>> {
        self.check()?;
        self.inner.get_franchise(id).await
    }

    async fn find_franchise_by_name(&self, name: &str) -> StoreResult<Option<Franchise>> {
        self.check()?;
        self.inner.find_franchise_by_name(name).await
    }

    async fn franchise_name_exists(&self, name: &str) -> StoreResult<bool> {
        self.exists(self.inner.franchise_name_exists(name)).await
    }

    async fn insert_franchise(&self, franchise: NewFranchise) -> StoreResult<SaveOutcome<Franchise>> {
        self.check()?;
        self.inner.insert_franchise(franchise).await
    }

    async fn replace_franchise(&self, franchise: Franchise) -> StoreResult<SaveOutcome<Franchise>> {
        self.check()?;
        self.inner.replace_franchise(franchise).await
    }
}

#[async_trait]
impl BranchRepository for TestStore {
    async fn get_branch(&self, id: i64) -> StoreResult<Option<Branch>> {
        self.check()?;
        self.inner.get_branch(id).await
    }

    async fn find_branch_by_name(&self, franchise_id: i64, name: &str) -> StoreResult<Option<Branch>> {
        self.check()?;
        self.inner.find_branch_by_name(franchise_id, name).await
    }

    async fn branch_name_exists(&self, franchise_id: i64, name: &str) -> StoreResult<bool> {
        self.exists(self.inner.branch_name_exists(franchise_id, name)).await
    }

    async fn list_branches(&self, franchise_id: i64) -> StoreResult<Vec<Branch>> {
        self.check()?;
        self.inner.list_branches(franchise_id).await
    }

    async fn insert_branch(&self, branch: NewBranch) -> StoreResult<SaveOutcome<Branch>> {
        self.check()?;
        self.inner.insert_branch(branch).await
    }

    async fn replace_branch(&self, branch: Branch) -> StoreResult<SaveOutcome<Branch>> {
        self.check()?;
        self.inner.replace_branch(branch).await
    }
}

#[async_trait]
impl ProductRepository for TestStore {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.check()?;
        self.inner.get_product(id).await
    }

    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        self.check()?;
        self.inner.find_product_by_name(name).await
    }

    async fn product_name_exists(&self, name: &str) -> StoreResult<bool> {
        self.exists(self.inner.product_name_exists(name)).await
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<SaveOutcome<Product>> {
        self.check()?;
        self.inner.insert_product(product).await
    }

    async fn replace_product(&self, product: Product) -> StoreResult<SaveOutcome<Product>> {
        self.check()?;
        self.inner.replace_product(product).await
    }
}

#[async_trait]
impl BranchProductRepository for TestStore {
    async fn get_link(&self, id: i64) -> StoreResult<Option<BranchProduct>> {
        self.check()?;
        self.inner.get_link(id).await
    }

    async fn find_link(&self, branch_id: i64, product_id: i64) -> StoreResult<Option<BranchProduct>> {
        self.check()?;
        self.inner.find_link(branch_id, product_id).await
    }

    // Pair existence also guards delete and stock updates, so it is never blinded.
    async fn link_exists(&self, branch_id: i64, product_id: i64) -> StoreResult<bool> {
        self.check()?;
        self.inner.link_exists(branch_id, product_id).await
    }

    async fn list_links(&self, branch_id: i64) -> StoreResult<Vec<BranchProduct>> {
        self.check()?;
        self.inner.list_links(branch_id).await
    }

    async fn insert_link(&self, link: NewBranchProduct) -> StoreResult<SaveOutcome<BranchProduct>> {
        self.check()?;
        self.inner.insert_link(link).await
    }

    async fn replace_link(&self, link: BranchProduct) -> StoreResult<SaveOutcome<BranchProduct>> {
        self.check()?;
        self.inner.replace_link(link).await
    }

    async fn update_link_stock(
        &self,
        branch_id: i64,
        product_id: i64,
        stock: i32,
    ) -> StoreResult<Option<BranchProduct>> {
        self.check()?;
        self.inner.update_link_stock(branch_id, product_id, stock).await
    }

    async fn delete_link(&self, branch_id: i64, product_id: i64) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete_link(branch_id, product_id).await
    }
}

#[async_trait]
impl ReportingQuery for TestStore {
    async fn top_stock_per_branch(&self, franchise_id: i64) -> StoreResult<Vec<TopStockRow>> {
        self.check()?;
        self.inner.top_stock_per_branch(franchise_id).await
    }
}

pub async fn franchise<S: CatalogStore>(
    catalog: &Catalog<S>,
    name: &str,
) -> i64 {
    catalog
        .franchises
        .create(FranchiseRequest {
            name: Some(name.to_string()),
        })
        .await
        .unwrap()
        .id
}

pub async fn branch<S: CatalogStore>(
    catalog: &Catalog<S>,
    franchise_id: i64,
    name: &str,
) -> i64 {
    catalog
        .branches
        .create(BranchRequest {
            franchise_id: Some(franchise_id),
            name: Some(name.to_string()),
        })
        .await
        .unwrap()
        .id
}

pub async fn product<S: CatalogStore>(
    catalog: &Catalog<S>,
    name: &str,
) -> i64 {
    catalog
        .products
        .create(ProductRequest {
            name: Some(name.to_string()),
        })
        .await
        .unwrap()
        .id
}

pub async fn stock<S: CatalogStore>(
    catalog: &Catalog<S>,
    branch_id: i64,
    product_id: i64,
    stock: i32,
) -> i64 {
    catalog
        .stock
        .create(link_request(branch_id, product_id, stock))
        .await
        .unwrap()
        .id
}

pub fn link_request(branch_id: i64, product_id: i64, stock: i32) -> BranchProductRequest {
    BranchProductRequest {
        branch_id: Some(branch_id),
        product_id: Some(product_id),
        stock: Some(stock),
    }
}
