use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::models::{NewUser, User};

/// Storage port for users.
///
/// Implementations assign ids on `create` and enforce email uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it with its assigned id
    async fn create(&self, user: NewUser) -> StorageResult<User>;

    /// Get a user by email (exact match)
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Get a user by ID
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// All users in creation order
    async fn find_all(&self) -> StorageResult<Vec<User>>;

    /// Save name, email and `updated_at` of an existing user
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Remove a user
    async fn delete(&self, user: &User) -> StorageResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Uuid, User>,
    order: Vec<Uuid>,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> StorageResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, None) {
            return Err(StorageError::DuplicateEmail(user.email));
        }

        let user = User::from_new(Uuid::now_v7(), user, Utc::now());
        store.order.push(user.id);
        store.users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "Stored user in memory");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_all(&self) -> StorageResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.users.get(id).cloned())
            .collect())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&user.id) {
            return Err(StorageError::Database(format!(
                "no row for user {}",
                user.id
            )));
        }

        if store.email_taken(&user.email, Some(user.id)) {
            return Err(StorageError::DuplicateEmail(user.email.clone()));
        }

        store.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, user: &User) -> StorageResult<()> {
        let mut store = self.store.write().await;

        if store.users.remove(&user.id).is_some() {
            store.order.retain(|id| *id != user.id);
        }
        Ok(())
    }
}
