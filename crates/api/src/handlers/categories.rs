use axum::extract::State;
use axum::Json;
use devloop_db::models::script::CategoryCount;
use devloop_db::repositories::ScriptRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryCount>>> {
    let counts = ScriptRepo::category_counts(&state.pool).await?;
    Ok(Json(counts))
}
