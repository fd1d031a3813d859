use crate::core::branch::BranchService;
use crate::core::branch_product::BranchProductService;
use crate::core::franchise::FranchiseService;
use crate::core::product::ProductService;
use crate::domain::ports::CatalogStore;

/// Wires every service to one store handle.
#[derive(Clone)]
pub struct Catalog<S> {
    pub franchises: FranchiseService<S>,
    pub branches: BranchService<S>,
    pub products: ProductService<S>,
    pub stock: BranchProductService<S>,
}

impl<S: CatalogStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self {
            franchises: FranchiseService::new(store.clone()),
            branches: BranchService::new(store.clone()),
            products: ProductService::new(store.clone()),
            stock: BranchProductService::new(store),
        }
    }
}
