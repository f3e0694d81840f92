//! Repository for the `scripts` table.

use std::collections::HashMap;

use devloop_core::metadata::{ScriptDescriptor, DEFAULT_CATEGORY};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::script::{CategoryCount, ScriptFilter, ScriptRow};

/// Column list for `scripts` SELECT queries.
const COLUMNS: &str = "id, name, description, author, category, tags, inputs, path";

/// Provides catalog operations over indexed scripts.
pub struct ScriptRepo;

impl ScriptRepo {
    /// Insert a script, replacing any existing row with the same id.
    pub async fn save(pool: &SqlitePool, script: &ScriptDescriptor) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO scripts \
                (id, name, description, author, category, tags, inputs, path, search_text) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             ON CONFLICT (id) DO UPDATE SET \
                name = excluded.name, \
                description = excluded.description, \
                author = excluded.author, \
                category = excluded.category, \
                tags = excluded.tags, \
                inputs = excluded.inputs, \
                path = excluded.path, \
                search_text = excluded.search_text",
        )
        .bind(&script.id)
        .bind(&script.name)
        .bind(&script.description)
        .bind(&script.author)
        .bind(&script.category)
        .bind(Json(&script.tags))
        .bind(Json(&script.inputs))
        .bind(&script.path)
        .bind(search_text(script))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Remove every script from the catalog. Returns the number removed.
    pub async fn clear(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Find a script by its id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<Option<ScriptDescriptor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scripts WHERE id = ?1");
        let row = sqlx::query_as::<_, ScriptRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Fetch several scripts, returned in the order of `ids`.
    ///
    /// Ids with no matching row are skipped.
    pub async fn find_by_ids(
        pool: &SqlitePool,
        ids: &[String],
    ) -> Result<Vec<ScriptDescriptor>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query =
            format!("SELECT {COLUMNS} FROM scripts WHERE id IN (SELECT value FROM json_each(?1))");
        let rows = sqlx::query_as::<_, ScriptRow>(&query)
            .bind(Json(ids))
            .fetch_all(pool)
            .await?;

        let mut by_id: HashMap<String, ScriptDescriptor> = rows
            .into_iter()
            .map(|row| (row.id.clone(), row.into()))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Number of scripts in the catalog.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM scripts")
            .fetch_one(pool)
            .await
    }

    /// Delete a script row. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List scripts matching `filter`, ordered by name then id.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ScriptFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ScriptDescriptor>, sqlx::Error> {
        let search = filter.search.as_deref().and_then(like_pattern);
        let category = non_blank(filter.category.as_deref());
        let tag = non_blank(filter.tag.as_deref());

        let query = format!(
            "SELECT {COLUMNS} FROM scripts \
             WHERE (?1 IS NULL OR search_text LIKE ?1 ESCAPE '\\') \
               AND (?2 IS NULL OR lower(category) = lower(?2)) \
               AND (?3 IS NULL OR EXISTS ( \
                    SELECT 1 FROM json_each(scripts.tags) t \
                    WHERE lower(t.value) = lower(?3))) \
             ORDER BY name, id \
             LIMIT ?4 OFFSET ?5"
        );

        let rows = sqlx::query_as::<_, ScriptRow>(&query)
            .bind(search)
            .bind(category)
            .bind(tag)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Script counts grouped by normalized (trimmed, lowercased) category,
    /// ordered by category name.
    pub async fn category_counts(pool: &SqlitePool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        let query = format!(
            "SELECT \
                CASE WHEN trim(category) = '' THEN '{DEFAULT_CATEGORY}' \
                     ELSE lower(trim(category)) END AS category, \
                COUNT(*) AS count \
             FROM scripts \
             GROUP BY 1 \
             ORDER BY 1"
        );
        sqlx::query_as::<_, CategoryCount>(&query)
        .fetch_all(pool)
        .await
    }
}

/// Searchable fields joined by newlines and lowercased in Rust.
///
/// SQLite's `lower()` only folds ASCII, so both the stored text and the
/// pattern are folded on this side.
fn search_text(script: &ScriptDescriptor) -> String {
    [
        script.name.as_str(),
        script.description.as_str(),
        script.author.as_str(),
        script.category.as_str(),
        &script.tags.join("\n"),
        script.path.as_str(),
    ]
    .join("\n")
    .to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercased `%term%` pattern with LIKE wildcards escaped.
fn like_pattern(term: &str) -> Option<String> {
    let term = non_blank(Some(term))?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}
