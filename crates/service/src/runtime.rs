//! Store construction for the configured backend.

use std::path::Path;
use std::sync::Arc;

use configs::{AppConfig, StorageBackend};
use tracing::info;

use crate::domain::Calculation;
use crate::file::{FileCalculationStore, FileUserStore};
use crate::repo::{SeaOrmCalculationStore, SeaOrmUserStore};
use crate::storage::{EntityStore, UserStore};

pub const CALCULATIONS_FILE: &str = "calculations.json";
pub const USERS_FILE: &str = "users.json";

/// The two entity stores, type-erased so handlers don't care which backend is live.
#[derive(Clone)]
pub struct Stores {
    pub calculations: Arc<dyn EntityStore<Calculation>>,
    pub users: Arc<dyn UserStore>,
}

/// Ensure the data directory exists.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_dir).await
}

/// JSON-file tables under `data_dir`. Table files are created on first open.
pub async fn open_file_stores(data_dir: impl AsRef<Path>) -> anyhow::Result<Stores> {
    let dir = data_dir.as_ref();
    let calculations = FileCalculationStore::new(dir.join(CALCULATIONS_FILE)).await?;
    let users = FileUserStore::new(dir.join(USERS_FILE)).await?;
    info!(data_dir = %dir.display(), "file stores opened");
    Ok(Stores { calculations, users })
}

/// Open the stores selected by `storage.backend`.
pub async fn open_stores(cfg: &AppConfig) -> anyhow::Result<Stores> {
    match cfg.storage.backend {
        StorageBackend::File => open_file_stores(&cfg.storage.data_dir).await,
        StorageBackend::Postgres => {
            let db = models::db::connect_and_migrate(&cfg.database).await?;
            info!("postgres stores opened");
            Ok(Stores {
                calculations: SeaOrmCalculationStore::new(db.clone()),
                users: SeaOrmUserStore::new(db),
            })
        }
    }
}
