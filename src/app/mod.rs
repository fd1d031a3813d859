pub mod runner;

pub use runner::{CatalogRunner, SeedReport};
