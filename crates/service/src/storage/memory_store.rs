use async_trait::async_trait;
use models::User;
use tokio::sync::RwLock;

use super::UserStore;
use crate::errors::ServiceError;

/// In-process collection, for tests and embedding without a data file.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users: RwLock::new(users) }
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn load(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, users: &[User]) -> Result<(), ServiceError> {
        *self.users.write().await = users.to_vec();
        Ok(())
    }
}
