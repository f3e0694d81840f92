pub mod actions;
pub mod categories;
pub mod config;
pub mod health;
pub mod history;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /actions/scripts/load              POST   reload catalog
/// /actions/exec/scripts/{id}         POST   execute script
///
/// /scripts                           GET    list
/// /scripts/{id}                      GET    get (+content), DELETE
///
/// /history/scripts/recent            GET    recent distinct scripts
/// /history/scripts/{id}              GET    per-script history
/// /history/{id}                      GET, DELETE
///
/// /categories                        GET    category counts
/// /config                            GET, POST
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/actions", actions::router())
        .nest("/scripts", scripts::router())
        .nest("/history", history::router())
        .nest("/categories", categories::router())
        .nest("/config", config::router())
}
