#![cfg(test)]
use std::path::PathBuf;

use crate::cars::SqlCarStore;

/// Fresh SQLite-backed store in a temp file with the schema applied.
/// Returns the path so the caller can clean up.
pub async fn sqlite_store() -> Result<(SqlCarStore, PathBuf), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("svc_carro_{}.db", uuid::Uuid::new_v4()));
    let cfg = configs::DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..Default::default()
    };
    let store = SqlCarStore::new(&cfg);
    store.migrate().await?;
    Ok((store, path))
}
