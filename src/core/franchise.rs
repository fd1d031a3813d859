use crate::core::consistency::{franchise_not_found, guarded_write, same_name};
use crate::domain::model::{Franchise, FranchiseRequest, NewFranchise, Summary};
use crate::domain::ports::FranchiseRepository;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{require_id, require_name};

fn already_exists(name: &str) -> CatalogError {
    CatalogError::conflict(
        "FRANCHISE_ALREADY_EXISTS",
        format!("Franchise already exists: {}", name),
    )
}

#[derive(Clone)]
pub struct FranchiseService<S> {
    store: S,
}

impl<S: FranchiseRepository> FranchiseService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: FranchiseRequest) -> Result<Summary> {
        let name = require_name("FRANCHISE_NAME_REQUIRED", "Franchise", request.name.as_deref())?;
        tracing::debug!(name = %name, "creating franchise");

        let saved = guarded_write(
            self.store.franchise_name_exists(&name),
            self.store.insert_franchise(NewFranchise { name: name.clone() }),
        )
        .await?
        .into_result(|| already_exists(&name))?;

        Ok(Summary::from(&saved))
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Summary> {
        let id = require_id("FRANCHISE_ID_REQUIRED", "Franchise id", id)?;
        let new_name = require_name("FRANCHISE_NAME_REQUIRED", "Franchise", Some(name))?;

        let existing = self
            .store
            .get_franchise(id)
            .await?
            .ok_or_else(|| franchise_not_found(id))?;

        if same_name(&existing.name, &new_name) {
            tracing::debug!(id, "franchise rename is a no-op");
            return Ok(Summary::from(&existing));
        }

        let renamed = Franchise {
            name: new_name.clone(),
            ..existing
        };
        let saved = guarded_write(
            self.store.franchise_name_exists(&new_name),
            self.store.replace_franchise(renamed),
        )
        .await?
        .into_result(|| already_exists(&new_name))?;

        Ok(Summary::from(&saved))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Summary> {
        let name = require_name("FRANCHISE_NAME_REQUIRED", "Franchise", Some(name))?;

        self.store
            .find_franchise_by_name(&name)
            .await?
            .map(|franchise| Summary::from(&franchise))
            .ok_or_else(|| franchise_not_found(&name))
    }
}
