//! Storage abstractions for service layer
//!
//! `UserStore` is the whole-collection contract; `json_file_store` persists
//! it as a single JSON document and `memory_store` keeps it in process.

use async_trait::async_trait;
use models::User;

use crate::errors::ServiceError;

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Reads and writes the entire user collection at once.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Read the whole collection. Unreadable or malformed storage is an error.
    async fn load(&self) -> Result<Vec<User>, ServiceError>;
    /// Replace the whole collection. Readers never observe a partial write.
    async fn save(&self, users: &[User]) -> Result<(), ServiceError>;
}
