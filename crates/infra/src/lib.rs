//! Infrastructure layer: product persistence, configuration, orchestration.

pub mod config;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig, StoreLocation};
pub use service::InventoryService;
pub use store::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore, StoreError};
