use std::sync::Arc;

use crate::domain::{Calculation, CalculationFields};
use crate::storage::{json_table::JsonTable, EntityStore, StoreError};

/// File-backed calculation store, persisted as one JSON table.
#[derive(Clone)]
pub struct FileCalculationStore {
    table: Arc<JsonTable<Calculation>>,
}

impl FileCalculationStore {
    /// Open the store at `path`. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let table = JsonTable::<Calculation>::open(path).await?;
        Ok(Arc::new(Self { table }))
    }
}

#[async_trait::async_trait]
impl EntityStore<Calculation> for FileCalculationStore {
    async fn get_all(&self) -> Result<Vec<Calculation>, StoreError> {
        Ok(self.table.list().await)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Calculation>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, fields: CalculationFields) -> Result<Calculation, StoreError> {
        self.table.insert_with(|id, _| Ok(Calculation { id, fields })).await
    }

    async fn update(&self, id: i64, fields: CalculationFields) -> Result<Option<Calculation>, StoreError> {
        self.table.replace_with(id, |_| Ok(Calculation { id, fields })).await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.table.remove(id).await
    }
}
