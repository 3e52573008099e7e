//! Shared error types for the services crate.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use site_core::model::{ImageError, ProjectId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ApiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid API configuration: {0}")]
    Config(String),
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("unexpected response: {0}")]
    Malformed(String),
    #[error("image encoding failed: {0}")]
    Encoding(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// The `message` (or `error`) field the server put in its error body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server-provided message when there is one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }

    /// 404 or 405: the endpoint does not exist on this backend.
    #[must_use]
    pub fn is_unsupported_endpoint(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED)
        )
    }
}

/// Errors emitted while reading images picked from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImageLoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ImageError),
}

/// Errors emitted by `ProjectService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProjectServiceError {
    #[error("project {0} not found")]
    NotFound(ProjectId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProjectServiceError {
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ProjectServiceError::Api(err) => err.user_message(fallback),
            ProjectServiceError::NotFound(_) => "Project not found".to_owned(),
            ProjectServiceError::Storage(_) => fallback.to_owned(),
        }
    }
}

/// Errors emitted by `AnalysisService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisServiceError {
    #[error("the report PDF was not generated")]
    PdfNotReady,
    #[error("could not save report to {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AnalysisServiceError {
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AnalysisServiceError::Api(err) => err.user_message(fallback),
            other => other.to_string(),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
