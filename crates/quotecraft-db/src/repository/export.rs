//! # Export History Repository
//!
//! Append-only storage for export snapshots.
//!
//! Each entry keeps the whole snapshot as JSON text in `export_data`, so
//! later catalog edits never change what was exported. Entries are never
//! updated.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use quotecraft_core::{ExportDraft, ExportRecord, ExportSnapshot, UserId};

use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
struct ExportRow {
    id: i64,
    user_id: i64,
    username: String,
    export_data: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExportRow> for ExportRecord {
    type Error = DbError;

    fn try_from(row: ExportRow) -> DbResult<Self> {
        let export_data: ExportSnapshot = serde_json::from_str(&row.export_data).map_err(|e| {
            DbError::InvalidData(format!("export {}: {}", row.id, e))
        })?;

        Ok(ExportRecord {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            export_data,
            created_at: row.created_at,
        })
    }
}

const SELECT_EXPORTS: &str =
    "SELECT id, user_id, username, export_data, created_at FROM export_history";

/// Repository for export history.
#[derive(Debug, Clone)]
pub struct ExportRepository {
    pool: SqlitePool,
}

impl ExportRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        ExportRepository { pool }
    }

    /// Stores a snapshot and returns it with its assigned id.
    pub async fn save(&self, draft: &ExportDraft) -> DbResult<ExportRecord> {
        let export_data = serde_json::to_string(&draft.export_data)?;

        let id = sqlx::query(
            r#"
            INSERT INTO export_history (user_id, username, export_data, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(draft.user_id)
        .bind(&draft.username)
        .bind(&export_data)
        .bind(draft.created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            id,
            user_id = draft.user_id,
            lines = draft.export_data.selected_products.len(),
            total = %draft.export_data.total_price,
            "Export saved"
        );

        Ok(ExportRecord::from_draft(id, draft.clone()))
    }

    /// Lists every export, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<ExportRecord>> {
        let rows: Vec<ExportRow> =
            sqlx::query_as(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_EXPORTS))
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Loaded export history");
        rows.into_iter().map(ExportRecord::try_from).collect()
    }

    /// Lists one user's exports, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<ExportRecord>> {
        let rows: Vec<ExportRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            SELECT_EXPORTS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, count = rows.len(), "Loaded user export history");
        rows.into_iter().map(ExportRecord::try_from).collect()
    }

    /// Gets an export by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<ExportRecord>> {
        let row: Option<ExportRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_EXPORTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ExportRecord::try_from).transpose()
    }

    /// Counts stored exports.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM export_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
