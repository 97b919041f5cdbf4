
/// Transaction commit/rollback behaviour
pub mod transaction_tests;

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use crate::db::{connect_with_config, DatabaseConfig};

/// Fresh SQLite database with migrations applied. Keep the `TempDir` alive
/// for as long as the connection is used.
pub(crate) async fn setup_test_db() -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let mut cfg = DatabaseConfig::sqlite_file(&dir.path().join("models.db"));
    cfg.min_connections = 1;
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok((dir, db))
}
