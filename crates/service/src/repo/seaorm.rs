use std::sync::Arc;

use models::errors::ModelError;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::domain::{Calculation, CalculationFields, User, UserDraft};
use crate::storage::{EntityStore, StoreError, UserStore};

fn storage_err(e: ModelError) -> StoreError {
    match e {
        ModelError::UniqueViolation(_) => StoreError::DuplicateEmail,
        other => StoreError::Storage(other.to_string()),
    }
}

fn to_calculation(m: models::calculation::Model) -> Calculation {
    let fields = match m.data {
        Value::Object(map) => map,
        _ => CalculationFields::new(),
    };
    Calculation { id: m.id, fields }
}

fn to_user(m: models::user::Model) -> User {
    User { id: m.id, email: m.email, password_hash: m.password_hash }
}

pub struct SeaOrmCalculationStore {
    pub db: DatabaseConnection,
}

impl SeaOrmCalculationStore {
    pub fn new(db: DatabaseConnection) -> Arc<Self> { Arc::new(Self { db }) }
}

#[async_trait::async_trait]
impl EntityStore<Calculation> for SeaOrmCalculationStore {
    async fn get_all(&self) -> Result<Vec<Calculation>, StoreError> {
        let rows = models::calculation::list(&self.db).await.map_err(storage_err)?;
        Ok(rows.into_iter().map(to_calculation).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Calculation>, StoreError> {
        let row = models::calculation::get(&self.db, id).await.map_err(storage_err)?;
        Ok(row.map(to_calculation))
    }

    async fn create(&self, fields: CalculationFields) -> Result<Calculation, StoreError> {
        let row = models::calculation::create(&self.db, Value::Object(fields))
            .await
            .map_err(storage_err)?;
        Ok(to_calculation(row))
    }

    async fn update(&self, id: i64, fields: CalculationFields) -> Result<Option<Calculation>, StoreError> {
        let row = models::calculation::update(&self.db, id, Value::Object(fields))
            .await
            .map_err(storage_err)?;
        Ok(row.map(to_calculation))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        models::calculation::delete(&self.db, id).await.map_err(storage_err)
    }
}

/// Users in Postgres. The unique index on `email` makes the insert itself the
/// uniqueness check.
pub struct SeaOrmUserStore {
    pub db: DatabaseConnection,
}

impl SeaOrmUserStore {
    pub fn new(db: DatabaseConnection) -> Arc<Self> { Arc::new(Self { db }) }
}

#[async_trait::async_trait]
impl EntityStore<User> for SeaOrmUserStore {
    async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = models::user::list(&self.db).await.map_err(storage_err)?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = models::user::get(&self.db, id).await.map_err(storage_err)?;
        Ok(row.map(to_user))
    }

    async fn create(&self, draft: UserDraft) -> Result<User, StoreError> {
        let row = models::user::create(&self.db, &draft.email, &draft.password_hash)
            .await
            .map_err(storage_err)?;
        Ok(to_user(row))
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<Option<User>, StoreError> {
        let row = models::user::update(&self.db, id, &draft.email, &draft.password_hash)
            .await
            .map_err(storage_err)?;
        Ok(row.map(to_user))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        models::user::delete(&self.db, id).await.map_err(storage_err)
    }
}

#[async_trait::async_trait]
impl UserStore for SeaOrmUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = models::user::find_by_email(&self.db, email).await.map_err(storage_err)?;
        Ok(row.map(to_user))
    }
}
