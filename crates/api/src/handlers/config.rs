//! Read and replace the `config.json` settings.

use axum::extract::State;
use axum::Json;
use devloop_core::config::DevLoopConfig;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<DevLoopConfig> {
    Json(state.settings.read().await.clone())
}

/// POST /api/config
///
/// Persist the new settings, then swap them in. Empty sections fall back to
/// defaults.
pub async fn update_config(
    State(state): State<AppState>,
    Json(input): Json<DevLoopConfig>,
) -> AppResult<Json<DevLoopConfig>> {
    let updated = input.with_fallbacks();
    updated.save(&state.config.config_path()).await?;

    *state.settings.write().await = updated.clone();
    tracing::info!(
        folders = updated.script_folders.len(),
        extensions = updated.extension_commands.len(),
        "Configuration updated",
    );

    Ok(Json(updated))
}
