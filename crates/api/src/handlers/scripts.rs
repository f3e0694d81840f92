//! Handlers for browsing and removing catalog scripts.

use axum::extract::{Path, Query, State};
use axum::Json;
use devloop_core::metadata::ScriptDescriptor;
use devloop_core::pagination::{clamp_limit, page_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use devloop_db::models::script::ScriptFilter;
use devloop_db::repositories::ScriptRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::{RemoveFileParams, ScriptListParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// A script together with its current file content.
#[derive(Debug, Serialize)]
pub struct ScriptWithContent {
    #[serde(flatten)]
    pub script: ScriptDescriptor,
    pub content: String,
}

/// GET /api/scripts
///
/// Paginated, filtered catalog listing.
pub async fn list_scripts(
    State(state): State<AppState>,
    Query(params): Query<ScriptListParams>,
) -> AppResult<Json<Vec<ScriptDescriptor>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = page_offset(params.page, limit);
    let filter = ScriptFilter {
        search: params.search,
        category: params.category,
        tag: params.tag,
    };

    let scripts = ScriptRepo::list(&state.pool, &filter, offset, limit).await?;
    Ok(Json(scripts))
}

/// GET /api/scripts/{id}
///
/// The stored descriptor plus the file content read fresh from disk.
pub async fn get_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ScriptWithContent>> {
    let script = ScriptRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("script", &id))?;

    let bytes = tokio::fs::read(&script.path).await?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    Ok(Json(ScriptWithContent { script, content }))
}

/// DELETE /api/scripts/{id}
///
/// Removes the catalog entry; with `?rm=true` the file is deleted first.
pub async fn delete_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RemoveFileParams>,
) -> AppResult<Json<MessageResponse>> {
    let script = ScriptRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("script", &id))?;

    if params.rm {
        tokio::fs::remove_file(&script.path).await?;
        tracing::info!(script_id = %id, path = %script.path, "Removed script file");
    }

    ScriptRepo::delete(&state.pool, &id).await?;

    Ok(Json(MessageResponse {
        message: "Script deleted",
    }))
}
