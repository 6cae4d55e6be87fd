//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the collection document exists.
pub async fn ensure_env(data_file: &Path) -> anyhow::Result<()> {
    let Some(data_dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        // relative file name in the working directory
        return Ok(());
    };
    if tokio::fs::metadata(data_dir).await.is_err() {
        warn!(data_dir = %data_dir.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    info!(data_file = %data_file.display(), "data directory ready");
    Ok(())
}
