use site_core::model::{ProjectId, User};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn user_to_json(user: &User) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(ser)
}

pub(crate) fn user_from_json(raw: &str) -> Result<User, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn project_id_from_text(raw: String) -> Result<ProjectId, StorageError> {
    raw.parse().map_err(ser)
}
