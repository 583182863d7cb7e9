//! Application-level orchestration over the product store.
//!
//! Screens call these methods instead of the store directly: input is
//! validated before any write is attempted, store outcomes are mapped onto
//! [`InventoryError`], and "0 rows affected" becomes `NotFound`.

use tracing::instrument;

use stockwidget_core::{InventoryError, InventoryResult, ProductCode, RecordId};
use stockwidget_products::{
    BalanceCalculator, BalanceSummary, ProductDraft, ProductRecord, ValidationRules,
};

use crate::store::InventoryStore;

/// Validate-then-persist front for an [`InventoryStore`].
#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: S,
    rules: ValidationRules,
}

impl<S> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self::with_rules(store, ValidationRules::default())
    }

    pub fn with_rules(store: S, rules: ValidationRules) -> Self {
        Self { store, rules }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> InventoryService<S>
where
    S: InventoryStore,
{
    /// Validate an add-product form and insert it.
    #[instrument(skip(self, draft), err)]
    pub async fn add_product(&self, draft: &ProductDraft) -> InventoryResult<RecordId> {
        let record = self.rules.validate_new(draft)?;
        let id = self.store.create(&record).await?;
        tracing::info!(code = %record.code, %id, "product added");
        Ok(id)
    }

    /// Validate an edit form and apply it to the product with `code`.
    ///
    /// Returns the record as stored after the edit.
    #[instrument(skip(self, code, draft), fields(code = %code), err)]
    pub async fn edit_product(
        &self,
        code: &ProductCode,
        draft: &ProductDraft,
    ) -> InventoryResult<ProductRecord> {
        let record = self.rules.validate_edit(code, draft)?;
        match self.store.update(&record).await? {
            0 => Err(InventoryError::not_found(code.clone())),
            _ => {
                tracing::info!("product updated");
                Ok(record)
            }
        }
    }

    #[instrument(skip(self, code), fields(code = %code), err)]
    pub async fn product(&self, code: &ProductCode) -> InventoryResult<ProductRecord> {
        self.store
            .get_by_code(code)
            .await?
            .ok_or_else(|| InventoryError::not_found(code.clone()))
    }

    /// Every product, sorted by name.
    pub async fn products(&self) -> InventoryResult<Vec<ProductRecord>> {
        Ok(self.store.list_all().await?)
    }

    #[instrument(skip(self, code), fields(code = %code), err)]
    pub async fn remove_product(&self, code: &ProductCode) -> InventoryResult<()> {
        match self.store.delete(code).await? {
            0 => Err(InventoryError::not_found(code.clone())),
            removed => {
                tracing::info!(removed, "product removed");
                Ok(())
            }
        }
    }

    /// Total inventory value, Σ price × quantity.
    pub async fn balance(&self) -> InventoryResult<f64> {
        let records = self.store.list_all().await?;
        Ok(BalanceCalculator::total_value(&records))
    }

    pub async fn summary(&self) -> InventoryResult<BalanceSummary> {
        let records = self.store.list_all().await?;
        Ok(BalanceCalculator::summarize(&records))
    }
}
