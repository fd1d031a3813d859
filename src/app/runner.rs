use crate::config::toml_config::SeedConfig;
use crate::core::catalog::Catalog;
use crate::domain::model::{
    BranchProductRequest, BranchRequest, FranchiseRequest, ProductRequest, TopStockEntry,
};
use crate::domain::ports::CatalogStore;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub franchises: usize,
    pub products: usize,
    pub branches: usize,
    pub links: usize,
}

/// Loads a seed description through the validated catalog operations and
/// renders the top-stock report.
pub struct CatalogRunner<S> {
    catalog: Catalog<S>,
}

impl<S: CatalogStore> CatalogRunner<S> {
    pub fn new(store: S) -> Self {
        Self {
            catalog: Catalog::new(store),
        }
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    pub async fn seed(&self, seed: &SeedConfig) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for name in &seed.franchises {
            let franchise = self
                .catalog
                .franchises
                .create(FranchiseRequest {
                    name: Some(name.clone()),
                })
                .await?;
            tracing::debug!("Seeded franchise {} ({})", franchise.name, franchise.id);
            report.franchises += 1;
        }

        for name in &seed.products {
            let product = self
                .catalog
                .products
                .create(ProductRequest {
                    name: Some(name.clone()),
                })
                .await?;
            tracing::debug!("Seeded product {} ({})", product.name, product.id);
            report.products += 1;
        }

        for branch in &seed.branches {
            let franchise = self.catalog.franchises.get_by_name(&branch.franchise).await?;
            let created = self
                .catalog
                .branches
                .create(BranchRequest {
                    franchise_id: Some(franchise.id),
                    name: Some(branch.name.clone()),
                })
                .await?;
            tracing::debug!("Seeded branch {} under {}", created.name, created.franchise.name);
            report.branches += 1;
        }

        for entry in &seed.stock {
            let franchise = self.catalog.franchises.get_by_name(&entry.franchise).await?;
            let (branch, product) = tokio::try_join!(
                self.catalog.branches.get(franchise.id, &entry.branch),
                self.catalog.products.get_by_name(&entry.product),
            )?;
            self.catalog
                .stock
                .create(BranchProductRequest {
                    branch_id: Some(branch.id),
                    product_id: Some(product.id),
                    stock: Some(entry.stock),
                })
                .await?;
            report.links += 1;
        }

        tracing::info!(
            "Seed loaded: {} franchises, {} products, {} branches, {} stock links",
            report.franchises,
            report.products,
            report.branches,
            report.links
        );
        Ok(report)
    }

    pub async fn report(&self, franchise_name: &str) -> Result<Vec<TopStockEntry>> {
        let franchise = self.catalog.franchises.get_by_name(franchise_name).await?;
        let leaderboard = self.catalog.stock.top_stock_per_branch(franchise.id).await?;
        Ok(leaderboard.collect())
    }
}
