use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use models::User;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, info};

use super::UserStore;
use crate::errors::ServiceError;

/// Generic JSON file-backed list store.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. Writes go to a
/// sibling temporary file which is then renamed over the target, so a
/// reader sees either the old or the new document.
pub struct JsonFileStore<T> {
    file_path: PathBuf,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Initialize the store from a path. Creates the file with an empty list if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = Self::at(path);
        store.ensure_exists().await?;
        Ok(Arc::new(store))
    }

    /// Point at a path without touching the filesystem.
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _items: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create parent directories and seed `[]` when the document is missing.
    /// Returns whether a new document was written.
    pub async fn ensure_exists(&self) -> Result<bool, ServiceError> {
        // 无法判断文件是否存在时直接报错，绝不覆盖已有文档
        let exists = fs::try_exists(&self.file_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot stat {}: {e}", self.file_path.display())))?;
        if exists {
            return Ok(false);
        }
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", parent.display())))?;
        }
        self.write_all(&[]).await?;
        info!(path = %self.file_path.display(), "seeded empty collection document");
        Ok(true)
    }

    pub async fn read_all(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(|e| {
            ServiceError::Storage(format!("failed to read {}: {e}", self.file_path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ServiceError::Storage(format!("malformed document {}: {e}", self.file_path.display()))
        })
    }

    pub async fn write_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items)
            .map_err(|e| ServiceError::Storage(format!("failed to encode collection: {e}")))?;
        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, &data).await {
            return Err(ServiceError::Storage(format!("failed to write {}: {e}", tmp.display())));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Storage(format!(
                "failed to replace {}: {e}",
                self.file_path.display()
            )));
        }
        debug!(path = %self.file_path.display(), bytes = data.len(), "collection written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string());
        self.file_path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl UserStore for JsonFileStore<User> {
    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        self.read_all().await
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        self.write_all(users).await
    }
}
