//! Action endpoints: reload the catalog and execute a script.

use axum::extract::{Path, Query, State};
use axum::Json;
use devloop_core::scripting::ExecuteRequest;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::IncognitoParams;
use crate::response::LoadResponse;
use crate::scripting::loader;
use crate::state::AppState;

/// Request body for the load action.
#[derive(Debug, Deserialize)]
pub struct LoadScriptsRequest {
    #[serde(default)]
    pub folders: Vec<String>,
}

/// POST /api/actions/scripts/load
///
/// Rebuild the catalog from the given folders plus the configured ones.
pub async fn load_scripts(
    State(state): State<AppState>,
    Json(input): Json<LoadScriptsRequest>,
) -> AppResult<Json<LoadResponse>> {
    let settings = state.settings.read().await.clone();
    let count = loader::load_folders(&state.pool, &settings, &input.folders).await?;

    Ok(Json(LoadResponse {
        message: "Scripts loaded successfully",
        count,
    }))
}

/// POST /api/actions/exec/scripts/{id}
///
/// Runs the script and answers with its combined output as plain text once
/// every repeat has finished.
pub async fn execute_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<IncognitoParams>,
    Json(request): Json<ExecuteRequest>,
) -> AppResult<String> {
    let settings = state.settings.read().await.clone();
    state
        .orchestrator
        .execute(&id, request, params.incognito, &settings)
        .await
}
