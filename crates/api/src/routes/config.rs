use axum::routing::get;
use axum::Router;

use crate::handlers::config;
use crate::state::AppState;

/// Routes mounted at `/api/config`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(config::get_config).post(config::update_config))
}
