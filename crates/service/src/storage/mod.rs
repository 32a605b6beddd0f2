//! Storage abstractions for the service layer
//!
//! One store per entity type, keyed by a numeric identifier the store assigns.
//! Each mutating call is a single atomic write: it either lands completely or
//! leaves the store unchanged.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Calculation, CalculationFields, User, UserDraft};

pub mod json_table;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,
    #[error("storage error: {0}")]
    Storage(String),
}

/// A record type held by an [`EntityStore`], with the payload used to create or replace it.
pub trait Record: Clone + Send + Sync + 'static {
    type Draft: Send + Sync + 'static;
}

impl Record for Calculation {
    type Draft = CalculationFields;
}

impl Record for User {
    type Draft = UserDraft;
}

/// Persistence contract shared by every entity type.
#[async_trait]
pub trait EntityStore<R: Record>: Send + Sync {
    /// Every stored record in ascending id order.
    async fn get_all(&self) -> Result<Vec<R>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<R>, StoreError>;
    /// Assign a fresh identifier and persist.
    async fn create(&self, draft: R::Draft) -> Result<R, StoreError>;
    /// Replace the record at `id`; `None` if there is no such record.
    async fn update(&self, id: i64, draft: R::Draft) -> Result<Option<R>, StoreError>;
    /// Remove the record at `id`; returns whether it existed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// User persistence. `create` and `update` reject an email held by another
/// user with [`StoreError::DuplicateEmail`] inside the same write.
#[async_trait]
pub trait UserStore: EntityStore<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
