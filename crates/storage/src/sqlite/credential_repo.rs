use async_trait::async_trait;
use chrono::Utc;
use site_core::model::User;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser, user_from_json, user_to_json};
use crate::repository::{CredentialRepository, StorageError};

#[async_trait]
impl CredentialRepository for SqliteRepository {
    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT token FROM client_credentials WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let token: Option<String> = row.try_get("token").map_err(ser)?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT user_json FROM client_credentials WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: Option<String> = row.try_get("user_json").map_err(ser)?;
        raw.as_deref().map(user_from_json).transpose()
    }

    async fn save_session(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = user_to_json(user)?;
        sqlx::query(
            r"
            INSERT INTO client_credentials (id, token, user_json, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                user_json = excluded.user_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(token)
        .bind(user_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let user_json = user_to_json(user)?;
        sqlx::query(
            r"
            INSERT INTO client_credentials (id, token, user_json, updated_at)
            VALUES (1, NULL, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                user_json = excluded.user_json,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM client_credentials")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
