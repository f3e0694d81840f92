use axum::routing::post;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Routes mounted at `/api/actions`.
///
/// ```text
/// POST /scripts/load         -> load_scripts
/// POST /exec/scripts/{id}    -> execute_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scripts/load", post(actions::load_scripts))
        .route("/exec/scripts/{id}", post(actions::execute_script))
}
