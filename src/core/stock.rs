use crate::core::consistency::link_not_found;
use crate::core::enrichment::EnrichmentJoiner;
use crate::domain::model::BranchProductView;
use crate::domain::ports::CatalogStore;
use crate::utils::error::Result;
use crate::utils::validation::{require_id, require_stock};

/// Partial stock update on an existing branch-product pair.
#[derive(Clone)]
pub struct StockMutator<S> {
    store: S,
    joiner: EnrichmentJoiner<S>,
}

impl<S: CatalogStore> StockMutator<S> {
    pub fn new(store: S) -> Self {
        Self {
            joiner: EnrichmentJoiner::new(store.clone()),
            store,
        }
    }

    /// Replaces the stock of the pair and returns the enriched record.
    /// Keys are never touched.
    pub async fn apply(&self, branch_id: i64, product_id: i64, stock: i32) -> Result<BranchProductView> {
        let branch_id = require_id("BRANCH_ID_REQUIRED", "branchId", branch_id)?;
        let product_id = require_id("PRODUCT_ID_REQUIRED", "productId", product_id)?;
        let stock = require_stock(stock)?;

        if !self.store.link_exists(branch_id, product_id).await? {
            return Err(link_not_found(branch_id, product_id));
        }

        // The pair can still vanish between the check and the update.
        let updated = self
            .store
            .update_link_stock(branch_id, product_id, stock)
            .await?
            .ok_or_else(|| link_not_found(branch_id, product_id))?;

        tracing::debug!(branch_id, product_id, stock, "stock updated");
        self.joiner.link_view(&updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    #[tokio::test]
    async fn test_apply_updates_and_enriches() {
        let store = InMemoryStore::new();
        let f = store.seed_franchise("Acme").await;
        let b = store.seed_branch(f.id, "Centro").await;
        let p = store.seed_product("Tea").await;
        store.seed_link(b.id, p.id, 4).await;

        let view = StockMutator::new(store.clone()).apply(b.id, p.id, 0).await.unwrap();

        assert_eq!(view.stock, 0);
        assert_eq!(view.branch.id, b.id);
        assert_eq!(view.product.name, "Tea");
    }

    #[tokio::test]
    async fn test_missing_pair_is_not_found_without_write() {
        let store = InMemoryStore::new();
        let f = store.seed_franchise("Acme").await;
        let b = store.seed_branch(f.id, "Centro").await;
        store.reset_stats();

        let err = StockMutator::new(store.clone()).apply(b.id, 5, 3).await.unwrap_err();

        assert_eq!(err.code(), "BRANCH_PRODUCT_NOT_FOUND");
        assert_eq!(store.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_before_store_access() {
        let store = InMemoryStore::new();

        let err = StockMutator::new(store.clone()).apply(1, 1, -1).await.unwrap_err();

        assert_eq!(err.code(), "STOCK_INVALID");
        assert_eq!(store.stats().existence_checks, 0);
    }
}
