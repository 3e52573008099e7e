use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{info, warn};

use site_core::model::{Credentials, Registration, User};
use storage::repository::CredentialRepository;

use crate::api::{ApiClient, AuthResponse};
use crate::error::ApiError;

/// Where the current session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated(User),
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// A failed login or registration, carrying the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    message: String,
}

impl AuthFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const UNREACHABLE: &str = "Could not reach the server";

/// Owns the signed-in user and the stored token.
///
/// The session starts in `Loading` until `initialize` has checked any stored
/// token with the backend.
pub struct AuthSession {
    api: Arc<ApiClient>,
    credentials: Arc<dyn CredentialRepository>,
    state: RwLock<SessionState>,
}

impl AuthSession {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            api,
            credentials,
            state: RwLock::new(SessionState::Loading),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    /// Restores a stored session.
    ///
    /// Without a stored token no network call is made. A token the backend
    /// rejects, or any failure while checking it, clears stored credentials.
    pub async fn initialize(&self) -> SessionState {
        let token = match self.credentials.load_token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "could not read stored token");
                None
            }
        };
        if token.is_none() {
            return self.set_state(SessionState::Unauthenticated);
        }

        match self.restore_user().await {
            Ok(Some(user)) => {
                info!(user = %user.username, "restored session");
                self.set_state(SessionState::Authenticated(user))
            }
            Ok(None) => {
                info!("stored token was rejected");
                self.invalidate().await
            }
            Err(err) => {
                warn!(error = %err, "could not verify stored session");
                self.invalidate().await
            }
        }
    }

    /// `Ok(None)` when the backend says the token is no longer valid.
    async fn restore_user(&self) -> Result<Option<User>, ApiError> {
        if !self.api.verify_token().await? {
            return Ok(None);
        }
        let cached = self.credentials.load_user().await.unwrap_or_else(|err| {
            warn!(error = %err, "cached user unreadable, refetching profile");
            None
        });
        if let Some(user) = cached {
            return Ok(Some(user));
        }
        let user = self.api.profile().await?;
        self.credentials.save_user(&user).await?;
        Ok(Some(user))
    }

    /// # Errors
    ///
    /// Returns `AuthFailure` with the server's message, or a generic one when
    /// the server could not be reached.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthFailure> {
        let response = self
            .api
            .login(credentials.username(), credentials.password())
            .await
            .map_err(|err| failure_from_error(&err, LOGIN_FAILED))?;
        self.authenticate(response, LOGIN_FAILED).await
    }

    /// # Errors
    ///
    /// Returns `AuthFailure` with the server's message, or a generic one when
    /// the server could not be reached.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthFailure> {
        let response = self
            .api
            .register(registration)
            .await
            .map_err(|err| failure_from_error(&err, REGISTRATION_FAILED))?;
        self.authenticate(response, REGISTRATION_FAILED).await
    }

    /// Forgets the session locally. The backend is not told.
    pub async fn logout(&self) {
        info!("logging out");
        self.invalidate().await;
    }

    async fn authenticate(
        &self,
        response: AuthResponse,
        fallback: &str,
    ) -> Result<User, AuthFailure> {
        let (true, Some(token), Some(user)) = (response.success, response.token, response.user)
        else {
            return Err(AuthFailure::new(
                response.message.unwrap_or_else(|| fallback.to_owned()),
            ));
        };

        self.credentials
            .save_session(&token, &user)
            .await
            .map_err(|err| {
                warn!(error = %err, "could not store session");
                AuthFailure::new(fallback)
            })?;
        info!(user = %user.username, "signed in");
        self.set_state(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    async fn invalidate(&self) -> SessionState {
        if let Err(err) = self.credentials.clear().await {
            warn!(error = %err, "could not clear stored credentials");
        }
        self.set_state(SessionState::Unauthenticated)
    }

    fn set_state(&self, next: SessionState) -> SessionState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = next.clone();
        next
    }
}

fn failure_from_error(err: &ApiError, fallback: &str) -> AuthFailure {
    match err {
        ApiError::Http(_) => AuthFailure::new(UNREACHABLE),
        other => AuthFailure::new(other.user_message(fallback)),
    }
}
