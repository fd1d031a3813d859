use crate::domain::model::{
    Branch, BranchProduct, Franchise, NewBranch, NewBranchProduct, NewFranchise, NewProduct,
    Product, TopStockRow,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failures of the storage collaborator that carry no domain meaning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record {kind}#{id} does not exist")]
    MissingRecord { kind: &'static str, id: i64 },

    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of an insert or replace. A uniqueness rejection is an expected
/// outcome of a write, so it is reported as a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<T> {
    Saved(T),
    UniqueViolation { constraint: &'static str },
}

// Name lookups compare case-insensitively on the trimmed value.

#[async_trait]
pub trait FranchiseRepository: Send + Sync {
    async fn get_franchise(&self, id: i64) -> StoreResult<Option<Franchise>>;
    async fn find_franchise_by_name(&self, name: &str) -> StoreResult<Option<Franchise>>;
    async fn franchise_name_exists(&self, name: &str) -> StoreResult<bool>;
    async fn insert_franchise(&self, franchise: NewFranchise) -> StoreResult<SaveOutcome<Franchise>>;
    async fn replace_franchise(&self, franchise: Franchise) -> StoreResult<SaveOutcome<Franchise>>;
}

#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn get_branch(&self, id: i64) -> StoreResult<Option<Branch>>;
    async fn find_branch_by_name(&self, franchise_id: i64, name: &str)
        -> StoreResult<Option<Branch>>;
    async fn branch_name_exists(&self, franchise_id: i64, name: &str) -> StoreResult<bool>;
    async fn list_branches(&self, franchise_id: i64) -> StoreResult<Vec<Branch>>;
    async fn insert_branch(&self, branch: NewBranch) -> StoreResult<SaveOutcome<Branch>>;
    async fn replace_branch(&self, branch: Branch) -> StoreResult<SaveOutcome<Branch>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;
    async fn find_product_by_name(&self, name: &str) -> StoreResult<Option<Product>>;
    async fn product_name_exists(&self, name: &str) -> StoreResult<bool>;
    async fn insert_product(&self, product: NewProduct) -> StoreResult<SaveOutcome<Product>>;
    async fn replace_product(&self, product: Product) -> StoreResult<SaveOutcome<Product>>;
}

#[async_trait]
pub trait BranchProductRepository: Send + Sync {
    async fn get_link(&self, id: i64) -> StoreResult<Option<BranchProduct>>;
    async fn find_link(&self, branch_id: i64, product_id: i64)
        -> StoreResult<Option<BranchProduct>>;
    async fn link_exists(&self, branch_id: i64, product_id: i64) -> StoreResult<bool>;
    async fn list_links(&self, branch_id: i64) -> StoreResult<Vec<BranchProduct>>;
    async fn insert_link(&self, link: NewBranchProduct) -> StoreResult<SaveOutcome<BranchProduct>>;
    async fn replace_link(&self, link: BranchProduct) -> StoreResult<SaveOutcome<BranchProduct>>;
    /// Atomically replaces the stock of an existing pair. `None` when the pair is absent.
    async fn update_link_stock(
        &self,
        branch_id: i64,
        product_id: i64,
        stock: i32,
    ) -> StoreResult<Option<BranchProduct>>;
    /// Returns whether a record was removed.
    async fn delete_link(&self, branch_id: i64, product_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ReportingQuery: Send + Sync {
    /// One row per branch of the franchise that has stock links, ranked by
    /// stock descending then product id ascending, ordered by branch id.
    async fn top_stock_per_branch(&self, franchise_id: i64) -> StoreResult<Vec<TopStockRow>>;
}

/// Everything the engine needs from one store handle.
pub trait CatalogStore:
    FranchiseRepository
    + BranchRepository
    + ProductRepository
    + BranchProductRepository
    + ReportingQuery
    + Clone
    + 'static
{
}

impl<T> CatalogStore for T where
    T: FranchiseRepository
        + BranchRepository
        + ProductRepository
        + BranchProductRepository
        + ReportingQuery
        + Clone
        + 'static
{
}
