//! Product persistence boundary.
//!
//! `InventoryStore` is the storage-agnostic interface; `SqliteInventoryStore`
//! is the durable implementation and `InMemoryInventoryStore` backs tests.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use r#trait::{InventoryStore, StoreError};
pub use sqlite::{SCHEMA_VERSION, SqliteInventoryStore};
