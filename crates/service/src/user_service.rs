use std::sync::Arc;

use models::{
    user::{self, User, UserCandidate},
    ContentKind, Payload,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{errors::ServiceError, filter::ListFilter, storage::UserStore};

/// How `update` combines the request body with the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: the body is the whole record (minus `id`).
    Replace,
    /// PATCH: the body is overlaid on the stored record.
    Merge,
}

/// User registry use cases over a whole-collection store.
///
/// Mutations hold `write_lock` across load, modify and save so concurrent
/// requests in this process cannot lose writes or hand out the same id.
pub struct UserService {
    store: Arc<dyn UserStore>,
    write_lock: Mutex<()>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Users matching every predicate of `filter`, in storage order.
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<User>, ServiceError> {
        let users = self.store.load().await?;
        let total = users.len();
        let matched = filter.apply(users);
        debug!(total, matched = matched.len(), ?filter, "users listed");
        Ok(matched)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, ServiceError> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Decode, validate, assign the next id, append and persist.
    pub async fn create(&self, body: &[u8], kind: ContentKind) -> Result<User, ServiceError> {
        let candidate = Payload::decode(kind, body)?.into_candidate();
        let valid = user::validate(&candidate)?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.store.load().await?;
        let created = valid.into_user(next_id(&users)?);
        users.push(created.clone());
        self.store.save(&users).await?;
        info!(user_id = %created.id, name = %created.name, age = created.age, "user created");
        Ok(created)
    }

    /// Replace or merge the stored record. The path id always wins over
    /// anything in the body.
    pub async fn update(&self, id: &str, body: &[u8], mode: UpdateMode) -> Result<User, ServiceError> {
        let patch = Payload::json(body)?.into_candidate();

        let _guard = self.write_lock.lock().await;
        let mut users = self.store.load().await?;
        let idx = position(&users, id)?;
        let candidate = match mode {
            UpdateMode::Replace => patch,
            UpdateMode::Merge => UserCandidate::from_user(&users[idx]).merge(patch),
        };
        let updated = user::validate(&candidate)?.into_user(id);
        users[idx] = updated.clone();
        self.store.save(&users).await?;
        info!(user_id = %updated.id, ?mode, name = %updated.name, age = updated.age, "user updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.store.load().await?;
        let idx = position(&users, id)?;
        users.remove(idx);
        self.store.save(&users).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

fn position(users: &[User], id: &str) -> Result<usize, ServiceError> {
    users
        .iter()
        .position(|u| u.id == id)
        .ok_or_else(|| ServiceError::not_found("User"))
}

/// One past the largest numeric id in the collection; "1" when there is none.
/// Non-numeric ids are skipped. Ids are compared as `u128`, so a stored
/// `u64::MAX` still has a successor.
pub fn next_id(users: &[User]) -> Result<String, ServiceError> {
    let max = users
        .iter()
        .filter_map(|u| u.id.parse::<u128>().ok())
        .max()
        .unwrap_or(0);
    max.checked_add(1)
        .map(|next| next.to_string())
        .ok_or_else(|| ServiceError::Storage(format!("no id left after {max}")))
}
