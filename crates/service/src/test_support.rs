#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// A migrated throwaway database; the file lives as long as this value.
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: TempDir,
}

pub async fn get_db() -> Result<TestDb, anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let mut cfg = DatabaseConfig::sqlite_file(&dir.path().join("service.db"));
    cfg.min_connections = 1;
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(TestDb { db, _dir: dir })
}
