pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::InMemoryStore;
pub use app::runner::CatalogRunner;
pub use config::CatalogConfig;
pub use core::catalog::Catalog;
pub use utils::error::{CatalogError, ErrorCategory, Result};
