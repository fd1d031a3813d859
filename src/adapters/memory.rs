//! In-process store with the same uniqueness and parent constraints a
//! relational schema would enforce.
//!
//! Every write takes the table lock, so its constraint check and the mutation
//! happen atomically. Concurrent creators of the same key therefore get exactly
//! one `Saved` and one `UniqueViolation`, whatever their pre-checks saw.

use crate::domain::model::{
    name_key, Branch, BranchProduct, Franchise, NewBranch, NewBranchProduct, NewFranchise,
    NewProduct, Product, TopStockRow,
};
use crate::domain::ports::{
    BranchProductRepository, BranchRepository, FranchiseRepository, ProductRepository,
    ReportingQuery, SaveOutcome, StoreError, StoreResult,
};
use crate::domain::ranking;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

const UQ_FRANCHISE_NAME: &str = "uq_franchise_name";
const UQ_BRANCH_NAME: &str = "uq_branch_franchise_name";
const UQ_PRODUCT_NAME: &str = "uq_product_name";
const UQ_BRANCH_PRODUCT: &str = "uq_branch_product";

#[derive(Debug, Default)]
struct Tables {
    franchises: BTreeMap<i64, Franchise>,
    branches: BTreeMap<i64, Branch>,
    products: BTreeMap<i64, Product>,
    links: BTreeMap<i64, BranchProduct>,
    franchise_seq: i64,
    branch_seq: i64,
    product_seq: i64,
    link_seq: i64,
}

impl Tables {
    fn franchise_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let key = name_key(name);
        self.franchises
            .values()
            .any(|f| Some(f.id) != except && name_key(&f.name) == key)
    }

    fn branch_name_taken(&self, franchise_id: i64, name: &str, except: Option<i64>) -> bool {
        let key = name_key(name);
        self.branches.values().any(|b| {
            Some(b.id) != except && b.franchise_id == franchise_id && name_key(&b.name) == key
        })
    }

    fn product_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let key = name_key(name);
        self.products
            .values()
            .any(|p| Some(p.id) != except && name_key(&p.name) == key)
    }

    fn link_for(&self, branch_id: i64, product_id: i64) -> Option<&BranchProduct> {
        self.links
            .values()
            .find(|l| l.branch_id == branch_id && l.product_id == product_id)
    }

    fn check_link_parents(&self, branch_id: i64, product_id: i64) -> StoreResult<()> {
        if !self.branches.contains_key(&branch_id) {
            return Err(StoreError::MissingRecord {
                kind: "branch",
                id: branch_id,
            });
        }
        if !self.products.contains_key(&product_id) {
            return Err(StoreError::MissingRecord {
                kind: "product",
                id: product_id,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Counters {
    franchise_lookups: AtomicUsize,
    branch_lookups: AtomicUsize,
    product_lookups: AtomicUsize,
    link_lookups: AtomicUsize,
    existence_checks: AtomicUsize,
    writes: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// Snapshot of how often each kind of store call was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub franchise_lookups: usize,
    pub branch_lookups: usize,
    pub product_lookups: usize,
    pub link_lookups: usize,
    pub existence_checks: usize,
    /// Calls to any mutating operation, whether or not it was applied.
    pub writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    counters: Arc<Counters>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StoreStats {
        let c = &self.counters;
        StoreStats {
            franchise_lookups: c.franchise_lookups.load(Ordering::SeqCst),
            branch_lookups: c.branch_lookups.load(Ordering::SeqCst),
            product_lookups: c.product_lookups.load(Ordering::SeqCst),
            link_lookups: c.link_lookups.load(Ordering::SeqCst),
            existence_checks: c.existence_checks.load(Ordering::SeqCst),
            writes: c.writes.load(Ordering::SeqCst),
        }
    }

    pub fn reset_stats(&self) {
        let c = &self.counters;
        for counter in [
            &c.franchise_lookups,
            &c.branch_lookups,
            &c.product_lookups,
            &c.link_lookups,
            &c.existence_checks,
            &c.writes,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl FranchiseRepository for InMemoryStore {
    async fn get_franchise(&self, id: i64) -> StoreResult<Option<Franchise>> {
        bump(&self.counters.franchise_lookups);
        Ok(self.tables.read().await.franchises.get(&id).cloned())
    }

    async fn find_franchise_by_name(&self, name: &str) -> StoreResult<Option<Franchise>> {
        bump(&self.counters.franchise_lookups);
        let key = name_key(name);
        let tables = self.tables.read().await;
        Ok(tables
            .franchises
            .values()
            .find(|f| name_key(&f.name) == key)
            .cloned())
    }

    async fn franchise_name_exists(&self, name: &str) -> StoreResult<bool> {
        bump(&self.counters.existence_checks);
        Ok(self.tables.read().await.franchise_name_taken(name, None))
    }

    async fn insert_franchise(&self, franchise: NewFranchise) -> StoreResult<SaveOutcome<Franchise>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if tables.franchise_name_taken(&franchise.name, None) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_FRANCHISE_NAME,
            });
        }
        tables.franchise_seq += 1;
        let now = Utc::now();
        let saved = Franchise {
            id: tables.franchise_seq,
            name: franchise.name,
            created_at: now,
            updated_at: now,
        };
        tables.franchises.insert(saved.id, saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    async fn replace_franchise(&self, franchise: Franchise) -> StoreResult<SaveOutcome<Franchise>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if !tables.franchises.contains_key(&franchise.id) {
            return Err(StoreError::MissingRecord {
                kind: "franchise",
                id: franchise.id,
            });
        }
        if tables.franchise_name_taken(&franchise.name, Some(franchise.id)) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_FRANCHISE_NAME,
            });
        }
        tables.franchises.insert(franchise.id, franchise.clone());
        Ok(SaveOutcome::Saved(franchise))
    }
}

#[async_trait]
impl BranchRepository for InMemoryStore {
    async fn get_branch(&self, id: i64) -> StoreResult<Option<Branch>> {
        bump(&self.counters.branch_lookups);
        Ok(self.tables.read().await.branches.get(&id).cloned())
    }

    async fn find_branch_by_name(
        &self,
        franchise_id: i64,
        name: &str,
    ) -> StoreResult<Option<Branch>> {
        bump(&self.counters.branch_lookups);
        let key = name_key(name);
        let tables = self.tables.read().await;
        Ok(tables
            .branches
            .values()
            .find(|b| b.franchise_id == franchise_id && name_key(&b.name) == key)
            .cloned())
    }

    async fn branch_name_exists(&self, franchise_id: i64, name: &str) -> StoreResult<bool> {
        bump(&self.counters.existence_checks);
        Ok(self
            .tables
            .read()
            .await
            .branch_name_taken(franchise_id, name, None))
    }

    async fn list_branches(&self, franchise_id: i64) -> StoreResult<Vec<Branch>> {
        bump(&self.counters.branch_lookups);
        let tables = self.tables.read().await;
        Ok(tables
            .branches
            .values()
            .filter(|b| b.franchise_id == franchise_id)
            .cloned()
            .collect())
    }

    async fn insert_branch(&self, branch: NewBranch) -> StoreResult<SaveOutcome<Branch>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if !tables.franchises.contains_key(&branch.franchise_id) {
            return Err(StoreError::MissingRecord {
                kind: "franchise",
                id: branch.franchise_id,
            });
        }
        if tables.branch_name_taken(branch.franchise_id, &branch.name, None) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_BRANCH_NAME,
            });
        }
        tables.branch_seq += 1;
        let now = Utc::now();
        let saved = Branch {
            id: tables.branch_seq,
            franchise_id: branch.franchise_id,
            name: branch.name,
            created_at: now,
            updated_at: now,
        };
        tables.branches.insert(saved.id, saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    async fn replace_branch(&self, branch: Branch) -> StoreResult<SaveOutcome<Branch>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if !tables.branches.contains_key(&branch.id) {
            return Err(StoreError::MissingRecord {
                kind: "branch",
                id: branch.id,
            });
        }
        if tables.branch_name_taken(branch.franchise_id, &branch.name, Some(branch.id)) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_BRANCH_NAME,
            });
        }
        tables.branches.insert(branch.id, branch.clone());
        Ok(SaveOutcome::Saved(branch))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        bump(&self.counters.product_lookups);
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        bump(&self.counters.product_lookups);
        let key = name_key(name);
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .find(|p| name_key(&p.name) == key)
            .cloned())
    }

    async fn product_name_exists(&self, name: &str) -> StoreResult<bool> {
        bump(&self.counters.existence_checks);
        Ok(self.tables.read().await.product_name_taken(name, None))
    }

    async fn insert_product(&self, product: NewProduct) -> StoreResult<SaveOutcome<Product>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if tables.product_name_taken(&product.name, None) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_PRODUCT_NAME,
            });
        }
        tables.product_seq += 1;
        let now = Utc::now();
        let saved = Product {
            id: tables.product_seq,
            name: product.name,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(saved.id, saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    async fn replace_product(&self, product: Product) -> StoreResult<SaveOutcome<Product>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product.id) {
            return Err(StoreError::MissingRecord {
                kind: "product",
                id: product.id,
            });
        }
        if tables.product_name_taken(&product.name, Some(product.id)) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_PRODUCT_NAME,
            });
        }
        tables.products.insert(product.id, product.clone());
        Ok(SaveOutcome::Saved(product))
    }
}

#[async_trait]
impl BranchProductRepository for InMemoryStore {
    async fn get_link(&self, id: i64) -> StoreResult<Option<BranchProduct>> {
        bump(&self.counters.link_lookups);
        Ok(self.tables.read().await.links.get(&id).cloned())
    }

    async fn find_link(
        &self,
        branch_id: i64,
        product_id: i64,
    ) -> StoreResult<Option<BranchProduct>> {
        bump(&self.counters.link_lookups);
        Ok(self
            .tables
            .read()
            .await
            .link_for(branch_id, product_id)
            .cloned())
    }

    async fn link_exists(&self, branch_id: i64, product_id: i64) -> StoreResult<bool> {
        bump(&self.counters.existence_checks);
        Ok(self
            .tables
            .read()
            .await
            .link_for(branch_id, product_id)
            .is_some())
    }

    async fn list_links(&self, branch_id: i64) -> StoreResult<Vec<BranchProduct>> {
        bump(&self.counters.link_lookups);
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .values()
            .filter(|l| l.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn insert_link(&self, link: NewBranchProduct) -> StoreResult<SaveOutcome<BranchProduct>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        tables.check_link_parents(link.branch_id, link.product_id)?;
        if tables.link_for(link.branch_id, link.product_id).is_some() {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_BRANCH_PRODUCT,
            });
        }
        tables.link_seq += 1;
        let now = Utc::now();
        let saved = BranchProduct {
            id: tables.link_seq,
            branch_id: link.branch_id,
            product_id: link.product_id,
            stock: link.stock,
            created_at: now,
            updated_at: now,
        };
        tables.links.insert(saved.id, saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    async fn replace_link(&self, link: BranchProduct) -> StoreResult<SaveOutcome<BranchProduct>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        if !tables.links.contains_key(&link.id) {
            return Err(StoreError::MissingRecord {
                kind: "branch_product",
                id: link.id,
            });
        }
        tables.check_link_parents(link.branch_id, link.product_id)?;
        let clash = tables.link_for(link.branch_id, link.product_id).map(|l| l.id);
        if clash.is_some_and(|id| id != link.id) {
            return Ok(SaveOutcome::UniqueViolation {
                constraint: UQ_BRANCH_PRODUCT,
            });
        }
        tables.links.insert(link.id, link.clone());
        Ok(SaveOutcome::Saved(link))
    }

    async fn update_link_stock(
        &self,
        branch_id: i64,
        product_id: i64,
        stock: i32,
    ) -> StoreResult<Option<BranchProduct>> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        let updated = tables
            .links
            .values_mut()
            .find(|l| l.branch_id == branch_id && l.product_id == product_id)
            .map(|link| {
                link.stock = stock;
                link.clone()
            });
        Ok(updated)
    }

    async fn delete_link(&self, branch_id: i64, product_id: i64) -> StoreResult<bool> {
        bump(&self.counters.writes);
        let mut tables = self.tables.write().await;
        let before = tables.links.len();
        tables
            .links
            .retain(|_, l| !(l.branch_id == branch_id && l.product_id == product_id));
        Ok(tables.links.len() != before)
    }
}

#[async_trait]
impl ReportingQuery for InMemoryStore {
    async fn top_stock_per_branch(&self, franchise_id: i64) -> StoreResult<Vec<TopStockRow>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for link in tables.links.values() {
            let Some(branch) = tables.branches.get(&link.branch_id) else {
                continue;
            };
            if branch.franchise_id != franchise_id {
                continue;
            }
            let Some(product) = tables.products.get(&link.product_id) else {
                continue;
            };
            rows.push(TopStockRow {
                branch_id: branch.id,
                branch_name: branch.name.clone(),
                product_id: product.id,
                product_name: product.name.clone(),
                stock: link.stock,
            });
        }
        Ok(ranking::top_per_branch(rows).collect())
    }
}

#[cfg(test)]
impl InMemoryStore {
    fn expect_saved<T>(outcome: StoreResult<SaveOutcome<T>>) -> T {
        match outcome {
            Ok(SaveOutcome::Saved(value)) => value,
            other => panic!("seed write rejected: {:?}", other.err()),
        }
    }

    pub(crate) async fn seed_franchise(&self, name: &str) -> Franchise {
        Self::expect_saved(self.insert_franchise(NewFranchise { name: name.to_string() }).await)
    }

    pub(crate) async fn seed_branch(&self, franchise_id: i64, name: &str) -> Branch {
        Self::expect_saved(
            self.insert_branch(NewBranch {
                franchise_id,
                name: name.to_string(),
            })
            .await,
        )
    }

    pub(crate) async fn seed_product(&self, name: &str) -> Product {
        Self::expect_saved(self.insert_product(NewProduct { name: name.to_string() }).await)
    }

    pub(crate) async fn seed_link(&self, branch_id: i64, product_id: i64, stock: i32) -> BranchProduct {
        Self::expect_saved(
            self.insert_link(NewBranchProduct {
                branch_id,
                product_id,
                stock,
            })
            .await,
        )
    }
}
