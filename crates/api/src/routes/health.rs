//! Liveness endpoint, mounted at the root rather than under `/api`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use devloop_db::repositories::ScriptRepo;
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "dev-loop";

/// `GET /health` body.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Scripts currently in the catalog; absent when the count fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<i64>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = devloop_db::health_check(&state.pool).await.is_ok();
    let scripts = if db_healthy {
        ScriptRepo::count(&state.pool)
            .await
            .map_err(|e| tracing::warn!(error = %e, "Catalog count failed"))
            .ok()
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        scripts,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
