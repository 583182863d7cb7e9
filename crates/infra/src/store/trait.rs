use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockwidget_core::{InventoryError, ProductCode, RecordId};
use stockwidget_products::ProductRecord;

/// Store operation error.
///
/// These are infrastructure failures. Input validation happens before a
/// record ever reaches the store, so there is no validation variant here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` hit an existing row with the same code.
    #[error("product code already in use: {0}")]
    DuplicateCode(ProductCode),

    /// The storage engine failed (I/O, corruption, connection, decode).
    #[error("{operation} failed: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn persistence(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Persistence {
            operation,
            message: message.into(),
        }
    }
}

impl From<StoreError> for InventoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateCode(code) => InventoryError::DuplicateCode(code),
            other @ StoreError::Persistence { .. } => {
                InventoryError::Persistence(other.to_string())
            }
        }
    }
}

/// Durable CRUD over product records, keyed by product code.
///
/// ## Semantics
///
/// - `create` inserts one row and returns its surrogate id. Input is trusted;
///   callers validate first.
/// - `list_all` returns every record sorted ascending by name (byte-wise,
///   case sensitive), ties in insertion order. An empty store yields an empty
///   vector.
/// - `get_by_code` is an exact match. Should several rows share a code, the
///   earliest inserted one is returned.
/// - `update` replaces name, price and quantity of the rows matching the
///   record's code and returns how many rows changed (0 = no such code).
/// - `delete` removes the rows matching a code and returns how many.
///
/// Every call is a single attempt: no retries, no transaction spanning
/// calls. Implementations hold no state between calls beyond the storage
/// itself.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn create(&self, record: &ProductRecord) -> Result<RecordId, StoreError>;

    async fn list_all(&self) -> Result<Vec<ProductRecord>, StoreError>;

    async fn get_by_code(&self, code: &ProductCode) -> Result<Option<ProductRecord>, StoreError>;

    async fn update(&self, record: &ProductRecord) -> Result<u64, StoreError>;

    async fn delete(&self, code: &ProductCode) -> Result<u64, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn create(&self, record: &ProductRecord) -> Result<RecordId, StoreError> {
        (**self).create(record).await
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        (**self).list_all().await
    }

    async fn get_by_code(&self, code: &ProductCode) -> Result<Option<ProductRecord>, StoreError> {
        (**self).get_by_code(code).await
    }

    async fn update(&self, record: &ProductRecord) -> Result<u64, StoreError> {
        (**self).update(record).await
    }

    async fn delete(&self, code: &ProductCode) -> Result<u64, StoreError> {
        (**self).delete(code).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        (**self).count().await
    }
}
