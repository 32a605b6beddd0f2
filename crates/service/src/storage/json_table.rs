use std::{collections::BTreeMap, path::{Path, PathBuf}, sync::Arc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::StoreError;

/// On-disk layout: the last identifier handed out plus the rows keyed by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TableFile<V> {
    last_id: i64,
    rows: BTreeMap<i64, V>,
}

impl<V> Default for TableFile<V> {
    fn default() -> Self {
        Self { last_id: 0, rows: BTreeMap::new() }
    }
}

/// JSON file-backed table of records keyed by an auto-assigned `i64`.
///
/// The whole table lives in memory. Every mutation is applied to a copy, the
/// copy is written to a temp file and renamed over the table file, and only
/// then swapped in; a failed write leaves both disk and memory untouched.
/// `last_id` is persisted so identifiers are never reused after a delete.
pub struct JsonTable<V> {
    inner: RwLock<TableFile<V>>,
    file_path: PathBuf,
}

impl<V> JsonTable<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the table at `path`, creating an empty one if the file is missing.
    /// A file that exists but cannot be parsed is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| storage_err(&file_path, e))?;
        }

        let table: TableFile<V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::Storage(format!("corrupt table file {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = TableFile::default();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(storage_err(&file_path, e)),
        };
        debug!(path = %file_path.display(), rows = table.rows.len(), last_id = table.last_id, "json table opened");

        Ok(Arc::new(Self { inner: RwLock::new(table), file_path }))
    }

    /// All rows in ascending id order.
    pub async fn list(&self) -> Vec<V> {
        let table = self.inner.read().await;
        table.rows.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<V> {
        let table = self.inner.read().await;
        table.rows.get(&id).cloned()
    }

    /// First row (lowest id) matching `pred`.
    pub async fn find<P>(&self, pred: P) -> Option<V>
    where
        P: Fn(&V) -> bool,
    {
        let table = self.inner.read().await;
        table.rows.values().find(|v| pred(v)).cloned()
    }

    /// Allocate the next id and insert the row built by `build`.
    ///
    /// `build` sees the current rows, so uniqueness checks run under the same
    /// write lock as the insert.
    pub async fn insert_with<F>(&self, build: F) -> Result<V, StoreError>
    where
        F: FnOnce(i64, &BTreeMap<i64, V>) -> Result<V, StoreError>,
    {
        let mut table = self.inner.write().await;
        let id = table.last_id + 1;
        let row = build(id, &table.rows)?;

        let mut next = table.clone();
        next.last_id = id;
        next.rows.insert(id, row.clone());
        write_atomic(&self.file_path, &next).await?;
        *table = next;
        Ok(row)
    }

    /// Replace the row at `id` with the one built by `build`; `None` if absent.
    pub async fn replace_with<F>(&self, id: i64, build: F) -> Result<Option<V>, StoreError>
    where
        F: FnOnce(&BTreeMap<i64, V>) -> Result<V, StoreError>,
    {
        let mut table = self.inner.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        let row = build(&table.rows)?;

        let mut next = table.clone();
        next.rows.insert(id, row.clone());
        write_atomic(&self.file_path, &next).await?;
        *table = next;
        Ok(Some(row))
    }

    /// Remove the row at `id` and persist; returns whether it existed.
    pub async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut table = self.inner.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(false);
        }

        let mut next = table.clone();
        next.rows.remove(&id);
        write_atomic(&self.file_path, &next).await?;
        *table = next;
        Ok(true)
    }
}

async fn write_atomic<V: Serialize>(path: &Path, table: &TableFile<V>) -> Result<(), StoreError> {
    let data = serde_json::to_vec(table).map_err(|e| StoreError::Storage(e.to_string()))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(|e| storage_err(&tmp, e))?;
    fs::rename(&tmp, path).await.map_err(|e| storage_err(path, e))?;
    Ok(())
}

fn storage_err(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Storage(format!("{}: {e}", path.display()))
}
