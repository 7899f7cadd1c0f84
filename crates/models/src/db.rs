use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use configs::DatabaseConfig;
use tracing::debug;

use crate::errors::ModelError;

/// Options for a single short-lived connection; the SQL store opens one per operation.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(1)
        .min_connections(0)
        .connect_timeout(cfg.connect_timeout())
        .acquire_timeout(cfg.acquire_timeout())
        .sqlx_logging(cfg.sqlx_logging);
    opts
}

pub async fn connect(opts: &ConnectOptions) -> Result<DatabaseConnection, ModelError> {
    let db = Database::connect(opts.clone()).await.map_err(|e| ModelError::Db(e.to_string()))?;
    debug!(backend = ?db.get_database_backend(), "sql connection opened");
    Ok(db)
}
