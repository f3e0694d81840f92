//! Repository for the `history` table.

use devloop_core::metadata::ScriptDescriptor;
use devloop_core::types::{DbId, ScriptId};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::history::{CreateHistory, HistoryRecord};
use crate::repositories::ScriptRepo;

/// Column list for `history` SELECT queries.
const COLUMNS: &str = "\
    id, script_id, executed_at, finished_at, execute_request, \
    output, exitcode, incognito, command, attempts";

/// Newest first; insertion order breaks timestamp ties.
const ORDER: &str = "ORDER BY executed_at DESC, id DESC";

/// Provides query operations for execution history records.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert a history record and return it with its assigned id.
    pub async fn create(
        pool: &SqlitePool,
        dto: &CreateHistory,
    ) -> Result<HistoryRecord, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO history (\
                script_id, executed_at, finished_at, execute_request, \
                output, exitcode, incognito, command, attempts\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             RETURNING id",
        )
        .bind(&dto.script_id)
        .bind(dto.executed_at)
        .bind(dto.finished_at)
        .bind(Json(&dto.execute_request))
        .bind(&dto.output)
        .bind(dto.exitcode)
        .bind(dto.incognito)
        .bind(&dto.command)
        .bind(Json(&dto.attempts))
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a history record by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<HistoryRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history WHERE id = ?1");
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through one script's history, newest first.
    pub async fn list_by_script(
        pool: &SqlitePool,
        script_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM history WHERE script_id = ?1 {ORDER} LIMIT ?2 OFFSET ?3");
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(script_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a history record. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct script ids among the `limit` most recent history rows,
    /// most recently run first.
    pub async fn recent_script_ids(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<ScriptId>, sqlx::Error> {
        let query = format!("SELECT script_id FROM history {ORDER} LIMIT ?1");
        let ids: Vec<ScriptId> = sqlx::query_scalar(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let mut distinct: Vec<ScriptId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !distinct.contains(&id) {
                distinct.push(id);
            }
        }
        Ok(distinct)
    }

    /// Recently executed scripts, most recent first.
    ///
    /// Scripts that ran but are no longer in the catalog are skipped.
    pub async fn recent_scripts(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<ScriptDescriptor>, sqlx::Error> {
        let ids = Self::recent_script_ids(pool, limit).await?;
        ScriptRepo::find_by_ids(pool, &ids).await
    }
}
