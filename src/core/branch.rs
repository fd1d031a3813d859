use crate::core::consistency::{branch_not_found, guarded_write, same_name};
use crate::core::enrichment::EnrichmentJoiner;
use crate::domain::model::{Branch, BranchRequest, BranchView, NewBranch};
use crate::domain::ports::CatalogStore;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{require_id, require_name};

fn already_exists(franchise_id: i64, name: &str) -> CatalogError {
    CatalogError::conflict(
        "BRANCH_ALREADY_EXISTS",
        format!("Branch already exists in franchiseId={}: {}", franchise_id, name),
    )
}

#[derive(Clone)]
pub struct BranchService<S> {
    store: S,
    joiner: EnrichmentJoiner<S>,
}

impl<S: CatalogStore> BranchService<S> {
    pub fn new(store: S) -> Self {
        Self {
            joiner: EnrichmentJoiner::new(store.clone()),
            store,
        }
    }

    pub async fn create(&self, request: BranchRequest) -> Result<BranchView> {
        let franchise_id =
            require_id("BRANCH_FRANCHISE_ID_REQUIRED", "franchiseId", request.franchise_id)?;
        let name = require_name("BRANCH_NAME_REQUIRED", "Branch", request.name.as_deref())?;

        let franchise = self.joiner.franchise(franchise_id).await?;
        tracing::debug!(franchise_id, name = %name, "creating branch");

        let saved = guarded_write(
            self.store.branch_name_exists(franchise_id, &name),
            self.store.insert_branch(NewBranch {
                franchise_id,
                name: name.clone(),
            }),
        )
        .await?
        .into_result(|| already_exists(franchise_id, &name))?;

        Ok(BranchView::new(&saved, &franchise))
    }

    /// Renames within the owning franchise; the franchise itself never changes.
    pub async fn rename(&self, id: i64, name: &str) -> Result<BranchView> {
        let id = require_id("BRANCH_ID_REQUIRED", "Branch id", id)?;
        let new_name = require_name("BRANCH_NAME_REQUIRED", "Branch", Some(name))?;

        let existing = self.joiner.branch(id).await?;
        let franchise = self.joiner.franchise(existing.franchise_id).await?;

        if same_name(&existing.name, &new_name) {
            tracing::debug!(id, "branch rename is a no-op");
            return Ok(BranchView::new(&existing, &franchise));
        }

        let franchise_id = existing.franchise_id;
        let renamed = Branch {
            name: new_name.clone(),
            ..existing
        };
        let saved = guarded_write(
            self.store.branch_name_exists(franchise_id, &new_name),
            self.store.replace_branch(renamed),
        )
        .await?
        .into_result(|| already_exists(franchise_id, &new_name))?;

        Ok(BranchView::new(&saved, &franchise))
    }

    /// Lists the branches of a franchise, fetching the franchise once.
    pub async fn list_by_franchise(&self, franchise_id: i64) -> Result<Vec<BranchView>> {
        let franchise_id = require_id("BRANCH_FRANCHISE_ID_REQUIRED", "franchiseId", franchise_id)?;

        let franchise = self.joiner.franchise(franchise_id).await?;
        let branches = self.store.list_branches(franchise_id).await?;

        Ok(self.joiner.franchise_branches_view(&franchise, &branches))
    }

    pub async fn get(&self, franchise_id: i64, name: &str) -> Result<BranchView> {
        let franchise_id = require_id("BRANCH_FRANCHISE_ID_REQUIRED", "franchiseId", franchise_id)?;
        let name = require_name("BRANCH_NAME_REQUIRED", "Branch", Some(name))?;

        let (franchise, branch) = tokio::try_join!(
            self.joiner.franchise(franchise_id),
            self.branch_by_name(franchise_id, &name)
        )?;

        Ok(BranchView::new(&branch, &franchise))
    }

    async fn branch_by_name(&self, franchise_id: i64, name: &str) -> Result<Branch> {
        self.store
            .find_branch_by_name(franchise_id, name)
            .await?
            .ok_or_else(|| branch_not_found(format!("{} in franchiseId={}", name, franchise_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::ports::BranchRepository;

    fn request(franchise_id: i64, name: &str) -> BranchRequest {
        BranchRequest {
            franchise_id: Some(franchise_id),
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_franchise() {
        let store = InMemoryStore::new();
        let service = BranchService::new(store.clone());

        let err = service.create(request(7, "Centro")).await.unwrap_err();

        assert_eq!(err.code(), "FRANCHISE_NOT_FOUND");
        assert_eq!(store.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_create_embeds_franchise() {
        let store = InMemoryStore::new();
        let franchise = store.seed_franchise("Acme").await;
        let service = BranchService::new(store);

        let view = service.create(request(franchise.id, " Centro ")).await.unwrap();

        assert_eq!(view.name, "Centro");
        assert_eq!(view.franchise.id, franchise.id);
        assert_eq!(view.franchise.name, "Acme");
    }

    #[tokio::test]
    async fn test_invalid_franchise_id() {
        let service = BranchService::new(InMemoryStore::new());
        let err = service
            .create(BranchRequest {
                franchise_id: Some(0),
                name: Some("Centro".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), "BRANCH_FRANCHISE_ID_REQUIRED");
    }

    #[tokio::test]
    async fn test_rename_same_name_skips_uniqueness_and_write() {
        let store = InMemoryStore::new();
        let franchise = store.seed_franchise("Acme").await;
        let branch = store.seed_branch(franchise.id, "Centro").await;
        store.reset_stats();

        let view = BranchService::new(store.clone())
            .rename(branch.id, "CENTRO")
            .await
            .unwrap();

        assert_eq!(view.name, "Centro");
        assert_eq!(store.stats().writes, 0);
        assert_eq!(store.stats().existence_checks, 0);
    }

    #[tokio::test]
    async fn test_rename_keeps_franchise_and_timestamps() {
        let store = InMemoryStore::new();
        let franchise = store.seed_franchise("Acme").await;
        let branch = store.seed_branch(franchise.id, "Centro").await;

        let view = BranchService::new(store.clone())
            .rename(branch.id, "Norte")
            .await
            .unwrap();
        let stored = store.get_branch(branch.id).await.unwrap().unwrap();

        assert_eq!(view.name, "Norte");
        assert_eq!(stored.franchise_id, franchise.id);
        assert_eq!(stored.created_at, branch.created_at);
        assert_eq!(stored.updated_at, branch.updated_at);
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let store = InMemoryStore::new();
        let franchise = store.seed_franchise("Acme").await;
        store.seed_branch(franchise.id, "Centro").await;
        let service = BranchService::new(store);

        let view = service.get(franchise.id, "centro").await.unwrap();
        let missing = service.get(franchise.id, "Sur").await.unwrap_err();

        assert_eq!(view.name, "Centro");
        assert_eq!(missing.code(), "BRANCH_NOT_FOUND");
    }
}
