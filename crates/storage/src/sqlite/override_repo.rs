use async_trait::async_trait;
use chrono::{DateTime, Utc};
use site_core::model::ProjectId;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, project_id_from_text, ser};
use crate::repository::{CompletionOverrideRepository, StorageError};

#[async_trait]
impl CompletionOverrideRepository for SqliteRepository {
    async fn list_overrides(&self) -> Result<Vec<ProjectId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT project_id
            FROM completed_overrides
            ORDER BY recorded_at ASC, project_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("project_id").map_err(ser)?;
                project_id_from_text(raw)
            })
            .collect()
    }

    // A single statement keeps the set duplicate-free even with several
    // app instances sharing one database file.
    async fn record_override(
        &self,
        project_id: &ProjectId,
        recorded_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO completed_overrides (project_id, recorded_at)
            VALUES (?1, ?2)
            ON CONFLICT(project_id) DO NOTHING
            ",
        )
        .bind(project_id.as_str())
        .bind(recorded_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.rows_affected() == 1)
    }

    async fn remove_override(&self, project_id: &ProjectId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM completed_overrides WHERE project_id = ?1")
            .bind(project_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        Ok(res.rows_affected() == 1)
    }
}
