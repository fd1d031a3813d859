pub mod memory;

pub use memory::{InMemoryStore, StoreStats};
