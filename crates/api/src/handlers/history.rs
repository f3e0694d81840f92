//! Handlers for execution history.

use axum::extract::{Path, Query, State};
use axum::Json;
use devloop_core::metadata::ScriptDescriptor;
use devloop_core::pagination::{
    clamp_limit, page_offset, DEFAULT_PAGE_LIMIT, DEFAULT_RECENT_LIMIT, MAX_PAGE_LIMIT,
};
use devloop_core::types::DbId;
use devloop_db::models::history::HistoryRecord;
use devloop_db::repositories::HistoryRepo;

use crate::error::{AppError, AppResult};
use crate::query::{LimitParams, PageParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/history/scripts/{id}
///
/// One script's executions, newest first.
pub async fn list_script_history(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<HistoryRecord>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = page_offset(params.page, limit);

    let records = HistoryRepo::list_by_script(&state.pool, &script_id, offset, limit).await?;
    Ok(Json(records))
}

/// GET /api/history/scripts/recent
///
/// Distinct recently executed scripts, most recent first.
pub async fn recent_scripts(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<ScriptDescriptor>>> {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_LIMIT, MAX_PAGE_LIMIT);
    let scripts = HistoryRepo::recent_scripts(&state.pool, limit).await?;
    Ok(Json(scripts))
}

/// GET /api/history/{id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HistoryRecord>> {
    let record = HistoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("history", id))?;
    Ok(Json(record))
}

/// DELETE /api/history/{id}
pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !HistoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("history", id));
    }
    Ok(Json(MessageResponse {
        message: "History deleted",
    }))
}
