use std::sync::RwLock;

use async_trait::async_trait;

use stockwidget_core::{Entity, ProductCode, RecordId};
use stockwidget_products::ProductRecord;

use super::r#trait::{InventoryStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    /// Kept in insertion (surrogate id) order.
    rows: Vec<(RecordId, ProductRecord)>,
}

/// In-memory product table.
///
/// Intended for tests/dev. Mirrors the SQLite store, including the unique
/// code constraint.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    table: RwLock<Table>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::persistence(operation, "lock poisoned")
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn create(&self, record: &ProductRecord) -> Result<RecordId, StoreError> {
        let mut table = self.table.write().map_err(|_| poisoned("create"))?;

        if table.rows.iter().any(|(_, r)| r.id() == record.id()) {
            return Err(StoreError::DuplicateCode(record.code.clone()));
        }

        table.last_id += 1;
        let id = RecordId::new(table.last_id);
        table.rows.push((id, record.clone()));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let table = self.table.read().map_err(|_| poisoned("list_all"))?;

        let mut records: Vec<ProductRecord> = table.rows.iter().map(|(_, r)| r.clone()).collect();
        // Stable sort: equal names stay in insertion order.
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn get_by_code(&self, code: &ProductCode) -> Result<Option<ProductRecord>, StoreError> {
        let table = self.table.read().map_err(|_| poisoned("get_by_code"))?;

        Ok(table
            .rows
            .iter()
            .find(|(_, r)| r.id() == code)
            .map(|(_, r)| r.clone()))
    }

    async fn update(&self, record: &ProductRecord) -> Result<u64, StoreError> {
        let mut table = self.table.write().map_err(|_| poisoned("update"))?;

        let mut affected = 0;
        for (_, row) in table.rows.iter_mut().filter(|(_, r)| r.code == record.code) {
            row.name = record.name.clone();
            row.price = record.price;
            row.quantity = record.quantity;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, code: &ProductCode) -> Result<u64, StoreError> {
        let mut table = self.table.write().map_err(|_| poisoned("delete"))?;

        let before = table.rows.len();
        table.rows.retain(|(_, r)| &r.code != code);
        Ok((before - table.rows.len()) as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let table = self.table.read().map_err(|_| poisoned("count"))?;
        Ok(table.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn round_trip() {
        contract::round_trip(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        contract::list_is_sorted_by_name(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        contract::empty_store_lists_nothing(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn update_missing_code_changes_nothing() {
        contract::update_missing_code_changes_nothing(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn update_keeps_code_and_replaces_fields() {
        contract::update_keeps_code_and_replaces_fields(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn delete_then_lookup_finds_nothing() {
        contract::delete_then_lookup_finds_nothing(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn duplicate_code_rejected() {
        contract::duplicate_code_rejected(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn laptop_scenario() {
        contract::laptop_scenario(InMemoryInventoryStore::new()).await;
    }

    #[tokio::test]
    async fn surrogate_ids_increase() {
        let store = InMemoryInventoryStore::new();
        let a = store.create(&contract::record("1", "A", 1.0, 1)).await.unwrap();
        let b = store.create(&contract::record("2", "B", 1.0, 1)).await.unwrap();
        assert!(b > a);
    }

    #[test]
    fn listing_ignores_insert_order() {
        contract::listing_ignores_insert_order(|| async { InMemoryInventoryStore::new() });
    }
}
