use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/api/history`.
///
/// The static `/scripts/recent` segment wins over `/scripts/{id}`.
///
/// ```text
/// GET    /scripts/recent    -> recent_scripts
/// GET    /scripts/{id}      -> list_script_history
/// GET    /{id}              -> get_history
/// DELETE /{id}              -> delete_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scripts/recent", get(history::recent_scripts))
        .route("/scripts/{id}", get(history::list_script_history))
        .route(
            "/{id}",
            get(history::get_history).delete(history::delete_history),
        )
}
