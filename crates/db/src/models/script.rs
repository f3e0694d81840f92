//! Models for the `scripts` table.

use devloop_core::metadata::{InputField, ScriptDescriptor};
use devloop_core::types::ScriptId;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row of the `scripts` table.
#[derive(Debug, Clone, FromRow)]
pub struct ScriptRow {
    pub id: ScriptId,
    pub name: String,
    pub description: String,
    pub author: String,
    pub category: String,
    pub tags: Json<Vec<String>>,
    pub inputs: Json<Vec<InputField>>,
    pub path: String,
}

impl From<ScriptRow> for ScriptDescriptor {
    fn from(row: ScriptRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            author: row.author,
            category: row.category,
            tags: row.tags.0,
            inputs: row.inputs.0,
            path: row.path,
        }
    }
}

/// Number of indexed scripts in one category.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Optional filters for [`crate::repositories::ScriptRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct ScriptFilter {
    /// Case-insensitive substring over name, description, author, category,
    /// tags, and path.
    pub search: Option<String>,
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    /// Exact tag membership, case-insensitive.
    pub tag: Option<String>,
}
