//! Runtime environment helpers
//!
//! Builds the configured record store so binary crates only deal with
//! `Arc<dyn CarStore>`.

use std::sync::Arc;

use configs::{AppConfig, StoreBackend};
use tracing::info;

use crate::cars::{CarStore, FileCarStore, MemoryCarStore, RemoteCarStore, SqlCarStore};

/// Construct the store selected by `cfg.store.backend`, preparing its backing resource.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn CarStore>> {
    let store: Arc<dyn CarStore> = match cfg.store.backend {
        StoreBackend::File => {
            common::env::ensure_data_dir(&cfg.store.file_path).await?;
            FileCarStore::new(&cfg.store.file_path).await?
        }
        StoreBackend::Memory => Arc::new(MemoryCarStore::new()),
        StoreBackend::Sql => {
            let store = SqlCarStore::new(&cfg.database);
            if cfg.database.auto_migrate {
                store.migrate().await?;
            }
            Arc::new(store)
        }
        StoreBackend::Remote => Arc::new(RemoteCarStore::new(&cfg.remote)?),
    };
    info!(backend = store.backend(), "record store ready");
    Ok(store)
}
