use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::{Calculation, CalculationInput};
use crate::errors::ServiceError;
use crate::storage::EntityStore;

/// Calculation CRUD. Adds nothing beyond the store except turning an absent
/// id into [`ServiceError::NotFound`].
pub struct CalculationService<S: ?Sized> {
    store: Arc<S>,
}

impl<S> CalculationService<S>
where
    S: EntityStore<Calculation> + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<Calculation>, ServiceError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Calculation, ServiceError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("calculation"))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CalculationInput) -> Result<Calculation, ServiceError> {
        let created = self.store.create(input.into_fields()).await?;
        info!(calculation_id = created.id, "calculation_created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: CalculationInput) -> Result<Calculation, ServiceError> {
        let updated = self
            .store
            .update(id, input.into_fields())
            .await?
            .ok_or_else(|| ServiceError::not_found("calculation"))?;
        info!(calculation_id = id, "calculation_updated");
        Ok(updated)
    }

    /// Delete by id; returns whether a record was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let existed = self.store.delete(id).await?;
        if existed {
            info!(calculation_id = id, "calculation_deleted");
        } else {
            debug!(calculation_id = id, "delete of absent calculation");
        }
        Ok(existed)
    }
}
