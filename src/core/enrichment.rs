use crate::core::consistency::{branch_not_found, franchise_not_found, product_not_found};
use crate::domain::model::{Branch, BranchProduct, BranchProductView, BranchView, Franchise, Product};
use crate::domain::ports::{BranchRepository, FranchiseRepository, ProductRepository};
use crate::utils::error::{CatalogError, Result};
use futures::future::try_join_all;

/// Resolves the parents needed to present stock links and branches.
///
/// Parents are looked up again at read time even though the write path already
/// checked them, since they may have changed in between. A parent shared by a
/// whole batch is fetched once per call.
#[derive(Clone)]
pub struct EnrichmentJoiner<S> {
    store: S,
}

impl<S> EnrichmentJoiner<S>
where
    S: FranchiseRepository + BranchRepository + ProductRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn franchise(&self, id: i64) -> Result<Franchise> {
        self.store
            .get_franchise(id)
            .await?
            .ok_or_else(|| franchise_not_found(id))
    }

    pub async fn branch(&self, id: i64) -> Result<Branch> {
        self.store
            .get_branch(id)
            .await?
            .ok_or_else(|| branch_not_found(id))
    }

    pub async fn product(&self, id: i64) -> Result<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    /// Fetches both parents of a link concurrently; the first failure drops the other.
    pub async fn parents_of(&self, branch_id: i64, product_id: i64) -> Result<(Branch, Product)> {
        tokio::try_join!(self.branch(branch_id), self.product(product_id))
    }

    pub async fn link_view(&self, link: &BranchProduct) -> Result<BranchProductView> {
        let (branch, product) = self.parents_of(link.branch_id, link.product_id).await?;
        Ok(BranchProductView::new(link, &branch, &product))
    }

    /// Presents links that all belong to `branch`. The branch is reused as is;
    /// only the products are fetched, concurrently. The first failure drops the rest.
    pub async fn branch_links_view(
        &self,
        branch: &Branch,
        links: &[BranchProduct],
    ) -> Result<Vec<BranchProductView>> {
        try_join_all(links.iter().map(|link| async move {
            let product = self.product(link.product_id).await?;
            Ok::<_, CatalogError>(BranchProductView::new(link, branch, &product))
        }))
        .await
    }

    pub fn franchise_branches_view(&self, franchise: &Franchise, branches: &[Branch]) -> Vec<BranchView> {
        branches
            .iter()
            .map(|branch| BranchView::new(branch, franchise))
            .collect()
    }

    pub async fn branch_view(&self, branch: &Branch) -> Result<BranchView> {
        let franchise = self.franchise(branch.franchise_id).await?;
        Ok(BranchView::new(branch, &franchise))
    }
}
