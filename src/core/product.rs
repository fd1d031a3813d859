use crate::core::consistency::{guarded_write, product_not_found, same_name};
use crate::domain::model::{NewProduct, Product, ProductRequest, Summary};
use crate::domain::ports::ProductRepository;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{require_id, require_name};

fn already_exists(name: &str) -> CatalogError {
    CatalogError::conflict(
        "PRODUCT_ALREADY_EXISTS",
        format!("Product already exists: {}", name),
    )
}

/// Products are global: their names are unique across every franchise.
#[derive(Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S: ProductRepository> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: ProductRequest) -> Result<Summary> {
        let name = require_name("PRODUCT_NAME_REQUIRED", "Product", request.name.as_deref())?;
        tracing::debug!(name = %name, "creating product");

        let saved = guarded_write(
            self.store.product_name_exists(&name),
            self.store.insert_product(NewProduct { name: name.clone() }),
        )
        .await?
        .into_result(|| already_exists(&name))?;

        Ok(Summary::from(&saved))
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Summary> {
        let id = require_id("PRODUCT_ID_REQUIRED", "Product id", id)?;
        let new_name = require_name("PRODUCT_NAME_REQUIRED", "Product", Some(name))?;

        let existing = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| product_not_found(id))?;

        if same_name(&existing.name, &new_name) {
            return Ok(Summary::from(&existing));
        }

        let renamed = Product {
            name: new_name.clone(),
            ..existing
        };
        let saved = guarded_write(
            self.store.product_name_exists(&new_name),
            self.store.replace_product(renamed),
        )
        .await?
        .into_result(|| already_exists(&new_name))?;

        Ok(Summary::from(&saved))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Summary> {
        let name = require_name("PRODUCT_NAME_REQUIRED", "Product", Some(name))?;

        self.store
            .find_product_by_name(&name)
            .await?
            .map(|product| Summary::from(&product))
            .ok_or_else(|| product_not_found(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    fn request(name: &str) -> ProductRequest {
        ProductRequest {
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_rename_to_same_name_does_not_write() {
        let store = InMemoryStore::new();
        let service = ProductService::new(store.clone());
        let created = service.create(request("Coffee")).await.unwrap();
        store.reset_stats();

        let result = service.rename(created.id, "  COFFEE ").await.unwrap();

        assert_eq!(result, created);
        assert_eq!(store.stats().writes, 0);
        assert_eq!(store.stats().existence_checks, 0);
    }

    #[tokio::test]
    async fn test_rename_onto_taken_name_conflicts() {
        let store = InMemoryStore::new();
        let service = ProductService::new(store.clone());
        service.create(request("Coffee")).await.unwrap();
        let tea = service.create(request("Tea")).await.unwrap();

        let err = service.rename(tea.id, "coffee").await.unwrap_err();

        assert_eq!(err.code(), "PRODUCT_ALREADY_EXISTS");
        assert_eq!(service.get_by_name("tea").await.unwrap(), tea);
    }

    #[tokio::test]
    async fn test_rename_unknown_product() {
        let service = ProductService::new(InMemoryStore::new());

        assert_eq!(
            service.rename(42, "Milk").await.unwrap_err().code(),
            "PRODUCT_NOT_FOUND"
        );
        assert_eq!(
            service.rename(0, "Milk").await.unwrap_err().code(),
            "PRODUCT_ID_REQUIRED"
        );
    }
}
