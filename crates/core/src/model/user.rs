use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

/// An authenticated account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("please fill in all fields")]
    MissingField,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("email address looks invalid")]
    InvalidEmail,
}

/// Username/password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError::MissingField` if either value is blank.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let username = username.into().trim().to_owned();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(CredentialsError::MissingField);
        }
        Ok(Self { username, password })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Raw registration form input.
#[derive(Clone, Debug, Default)]
pub struct RegistrationDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<String>,
}

/// Registration input that passed client-side checks.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: Credentials,
    email: String,
    role: Option<String>,
}

impl RegistrationDraft {
    /// # Errors
    ///
    /// Returns `CredentialsError` if a field is blank, the email has no `@`,
    /// or the password confirmation differs.
    pub fn validate(self) -> Result<Registration, CredentialsError> {
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            return Err(CredentialsError::MissingField);
        }
        let credentials = Credentials::new(self.username, self.password)?;
        if !email.contains('@') {
            return Err(CredentialsError::InvalidEmail);
        }
        if credentials.password() != self.confirm_password {
            return Err(CredentialsError::PasswordMismatch);
        }
        let role = self
            .role
            .map(|role| role.trim().to_owned())
            .filter(|role| !role.is_empty());

        Ok(Registration {
            credentials,
            email,
            role,
        })
    }
}

impl Registration {
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username())
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
