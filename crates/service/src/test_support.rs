#![cfg(test)]
use std::path::PathBuf;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::auth::CredentialHasher;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// A fresh table path under the system temp dir.
pub fn temp_table_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
}

/// Minimum-cost argon2id so hashing stays cheap in debug builds.
pub fn fast_hasher() -> CredentialHasher {
    CredentialHasher::new(8, 1, 1).unwrap()
}

fn test_db_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    })
}

/// Connection to the test database, or `None` when DB tests are disabled.
pub async fn get_db() -> Option<DatabaseConnection> {
    let cfg = test_db_config()?;
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;
    // Return a fresh connection for the current test's runtime
    Some(connect_with_config(&cfg).await.expect("connect test db"))
}
