//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;
use tracing::debug;

/// Ensure the parent directory of a data file exists.
pub async fn ensure_data_dir(data_file: &str) -> anyhow::Result<()> {
    let Some(dir) = Path::new(data_file).parent() else { return Ok(()) };
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    debug!(dir = %dir.display(), "data directory ready");
    Ok(())
}
