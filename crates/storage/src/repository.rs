use async_trait::async_trait;
use chrono::{DateTime, Utc};
use site_core::model::{ProjectId, User};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted login state: the bearer token and the cached user profile.
///
/// Both live and die together except that the profile may be cached after
/// the token was stored (when it had to be fetched from the server).
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Read the stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_token(&self) -> Result<Option<String>, StorageError>;

    /// Read the cached user profile, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the cached
    /// profile no longer deserializes.
    async fn load_user(&self) -> Result<Option<User>, StorageError>;

    /// Persist a fresh token together with the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the values cannot be stored.
    async fn save_session(&self, token: &str, user: &User) -> Result<(), StorageError>;

    /// Cache a user profile without touching the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;

    /// Forget both token and profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Client-side set of projects marked completed while the backend could not
/// record it.
#[async_trait]
pub trait CompletionOverrideRepository: Send + Sync {
    /// List overridden project ids in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn list_overrides(&self) -> Result<Vec<ProjectId>, StorageError>;

    /// Add a project id to the set. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn record_override(
        &self,
        project_id: &ProjectId,
        recorded_at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Drop a project id from the set. Returns `false` if it was not present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn remove_override(&self, project_id: &ProjectId) -> Result<bool, StorageError>;
}

#[derive(Default)]
struct CredentialState {
    token: Option<String>,
    user: Option<User>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    credentials: Arc<Mutex<CredentialState>>,
    overrides: Arc<Mutex<Vec<ProjectId>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        let guard = self.credentials.lock().map_err(poisoned)?;
        Ok(guard.token.clone())
    }

    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        let guard = self.credentials.lock().map_err(poisoned)?;
        Ok(guard.user.clone())
    }

    async fn save_session(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let mut guard = self.credentials.lock().map_err(poisoned)?;
        guard.token = Some(token.to_owned());
        guard.user = Some(user.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self.credentials.lock().map_err(poisoned)?;
        guard.user = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.credentials.lock().map_err(poisoned)?;
        *guard = CredentialState::default();
        Ok(())
    }
}

#[async_trait]
impl CompletionOverrideRepository for InMemoryRepository {
    async fn list_overrides(&self) -> Result<Vec<ProjectId>, StorageError> {
        let guard = self.overrides.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn record_override(
        &self,
        project_id: &ProjectId,
        _recorded_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut guard = self.overrides.lock().map_err(poisoned)?;
        if guard.contains(project_id) {
            return Ok(false);
        }
        guard.push(project_id.clone());
        Ok(true)
    }

    async fn remove_override(&self, project_id: &ProjectId) -> Result<bool, StorageError> {
        let mut guard = self.overrides.lock().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|id| id != project_id);
        Ok(guard.len() != before)
    }
}

/// Aggregates the client-side repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub credentials: Arc<dyn CredentialRepository>,
    pub overrides: Arc<dyn CompletionOverrideRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let credentials: Arc<dyn CredentialRepository> = Arc::new(repo.clone());
        let overrides: Arc<dyn CompletionOverrideRepository> = Arc::new(repo);
        Self {
            credentials,
            overrides,
        }
    }
}
