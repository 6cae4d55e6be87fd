//! Runtime environment helpers
//!
//! Prepares the collection document before the server starts listening.

use std::{path::Path, sync::Arc};

use models::User;
use tracing::info;

use crate::storage::{JsonFileStore, UserStore};

/// Ensure the data directory and document exist, then check the document
/// loads. Startup must not continue with an unreadable collection.
pub async fn prepare_storage(data_file: &Path) -> anyhow::Result<Arc<JsonFileStore<User>>> {
    common::env::ensure_env(data_file).await?;
    let store = JsonFileStore::<User>::new(data_file).await?;
    let users = store.load().await?;
    info!(path = %store.path().display(), users = users.len(), "collection document loaded");
    Ok(store)
}
