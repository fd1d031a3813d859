pub mod branch;
pub mod branch_product;
pub mod catalog;
pub mod consistency;
pub mod enrichment;
pub mod franchise;
pub mod leaderboard;
pub mod product;
pub mod stock;

pub use crate::domain::model::{BranchProductView, BranchView, Summary, TopStockEntry};
pub use crate::domain::ports::CatalogStore;
pub use crate::utils::error::Result;
