use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::domain::{User, UserDraft};
use crate::storage::{json_table::JsonTable, EntityStore, StoreError, UserStore};

/// Row as written to disk. Unlike [`User`], the hash is serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User { id: r.id, email: r.email, password_hash: r.password_hash }
    }
}

/// File-backed user store. Email uniqueness is checked under the table's
/// write lock, in the same step as the insert or replace.
#[derive(Clone)]
pub struct FileUserStore {
    table: Arc<JsonTable<UserRow>>,
}

impl FileUserStore {
    /// Open the store at `path`. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let table = JsonTable::<UserRow>::open(path).await?;
        Ok(Arc::new(Self { table }))
    }
}

fn email_taken(rows: &BTreeMap<i64, UserRow>, email: &str, except: Option<i64>) -> bool {
    rows.values().any(|r| r.email == email && Some(r.id) != except)
}

#[async_trait::async_trait]
impl EntityStore<User> for FileUserStore {
    async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.table.list().await.into_iter().map(User::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.table.get(id).await.map(User::from))
    }

    async fn create(&self, draft: UserDraft) -> Result<User, StoreError> {
        let row = self
            .table
            .insert_with(|id, rows| {
                if email_taken(rows, &draft.email, None) {
                    return Err(StoreError::DuplicateEmail);
                }
                Ok(UserRow { id, email: draft.email, password_hash: draft.password_hash })
            })
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<Option<User>, StoreError> {
        let row = self
            .table
            .replace_with(id, |rows| {
                if email_taken(rows, &draft.email, Some(id)) {
                    return Err(StoreError::DuplicateEmail);
                }
                Ok(UserRow { id, email: draft.email, password_hash: draft.password_hash })
            })
            .await?;
        Ok(row.map(User::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.table.remove(id).await
    }
}

#[async_trait::async_trait]
impl UserStore for FileUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.find(|r| r.email == email).await.map(User::from))
    }
}
