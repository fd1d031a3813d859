use crate::core::consistency::{guarded_write, link_not_found, WriteOutcome};
use crate::core::enrichment::EnrichmentJoiner;
use crate::core::leaderboard::{Leaderboard, LeaderboardComputer};
use crate::core::stock::StockMutator;
use crate::domain::model::{BranchProduct, BranchProductRequest, BranchProductView, NewBranchProduct};
use crate::domain::ports::CatalogStore;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{require_id, require_stock};

fn already_exists(branch_id: i64, product_id: i64) -> CatalogError {
    CatalogError::conflict(
        "BRANCH_PRODUCT_ALREADY_EXISTS",
        format!(
            "Product already exists in branch. branchId={}, productId={}",
            branch_id, product_id
        ),
    )
}

fn pair_ids(branch_id: impl Into<Option<i64>>, product_id: impl Into<Option<i64>>) -> Result<(i64, i64)> {
    Ok((
        require_id("BRANCH_ID_REQUIRED", "branchId", branch_id)?,
        require_id("PRODUCT_ID_REQUIRED", "productId", product_id)?,
    ))
}

/// Validated operations on stock links, plus the stock update and the
/// top-stock report built on top of them.
#[derive(Clone)]
pub struct BranchProductService<S> {
    store: S,
    joiner: EnrichmentJoiner<S>,
    mutator: StockMutator<S>,
    leaderboard: LeaderboardComputer<S>,
}

impl<S: CatalogStore> BranchProductService<S> {
    pub fn new(store: S) -> Self {
        Self {
            joiner: EnrichmentJoiner::new(store.clone()),
            mutator: StockMutator::new(store.clone()),
            leaderboard: LeaderboardComputer::new(store.clone()),
            store,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<BranchProductView> {
        let id = require_id("BRANCH_PRODUCT_ID_REQUIRED", "BranchProduct id", id)?;
        let link = self.link(id).await?;
        self.joiner.link_view(&link).await
    }

    pub async fn create(&self, request: BranchProductRequest) -> Result<BranchProductView> {
        let (branch_id, product_id) = pair_ids(request.branch_id, request.product_id)?;
        let stock = require_stock(request.stock)?;

        let (branch, product) = self.joiner.parents_of(branch_id, product_id).await?;
        tracing::debug!(branch_id, product_id, stock, "assigning product to branch");

        let saved = guarded_write(
            self.store.link_exists(branch_id, product_id),
            self.store.insert_link(NewBranchProduct {
                branch_id,
                product_id,
                stock,
            }),
        )
        .await?
        .into_result(|| already_exists(branch_id, product_id))?;

        Ok(BranchProductView::new(&saved, &branch, &product))
    }

    /// Full replace of an existing link. Only the stock may differ from the
    /// stored record; changing either key is rejected.
    pub async fn update(&self, id: i64, request: BranchProductRequest) -> Result<BranchProductView> {
        let id = require_id("BRANCH_PRODUCT_ID_REQUIRED", "BranchProduct id", id)?;
        let (branch_id, product_id) = pair_ids(request.branch_id, request.product_id)?;
        let stock = require_stock(request.stock)?;

        let existing = self.link(id).await?;
        if existing.branch_id != branch_id || existing.product_id != product_id {
            return Err(CatalogError::keys_immutable());
        }

        let updated = BranchProduct { stock, ..existing };
        let saved = WriteOutcome::from(self.store.replace_link(updated).await?)
            .into_result(|| already_exists(branch_id, product_id))?;

        self.joiner.link_view(&saved).await
    }

    pub async fn exists(&self, branch_id: i64, product_id: i64) -> Result<bool> {
        let (branch_id, product_id) = pair_ids(branch_id, product_id)?;
        Ok(self.store.link_exists(branch_id, product_id).await?)
    }

    pub async fn delete(&self, branch_id: i64, product_id: i64) -> Result<()> {
        let (branch_id, product_id) = pair_ids(branch_id, product_id)?;

        if !self.store.link_exists(branch_id, product_id).await? {
            return Err(link_not_found(branch_id, product_id));
        }
        if !self.store.delete_link(branch_id, product_id).await? {
            return Err(link_not_found(branch_id, product_id));
        }

        tracing::debug!(branch_id, product_id, "stock link deleted");
        Ok(())
    }

    /// Lists a branch's links. The branch is fetched once and shared by every item.
    pub async fn list_by_branch(&self, branch_id: i64) -> Result<Vec<BranchProductView>> {
        let branch_id = require_id("BRANCH_ID_REQUIRED", "branchId", branch_id)?;

        let branch = self.joiner.branch(branch_id).await?;
        let links = self.store.list_links(branch_id).await?;

        self.joiner.branch_links_view(&branch, &links).await
    }

    pub async fn get_by_branch_and_product(&self, branch_id: i64, product_id: i64) -> Result<BranchProductView> {
        let (branch_id, product_id) = pair_ids(branch_id, product_id)?;

        let link = self
            .store
            .find_link(branch_id, product_id)
            .await?
            .ok_or_else(|| link_not_found(branch_id, product_id))?;

        self.joiner.link_view(&link).await
    }

    pub async fn update_stock(&self, branch_id: i64, product_id: i64, stock: i32) -> Result<BranchProductView> {
        self.mutator.apply(branch_id, product_id, stock).await
    }

    pub async fn top_stock_per_branch(&self, franchise_id: i64) -> Result<Leaderboard> {
        self.leaderboard.compute(franchise_id).await
    }

    async fn link(&self, id: i64) -> Result<BranchProduct> {
        self.store.get_link(id).await?.ok_or_else(|| {
            CatalogError::not_found("BRANCH_PRODUCT_NOT_FOUND", format!("BranchProduct not found: {}", id))
        })
    }
}
