//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, TestApp};
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = get(app.router.clone(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "dev-loop");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["scripts"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_catalog_size(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.write_script("a.sh", "# @name: A\necho a\n");
    app.write_script("b.sh", "# @name: B\necho b\n");
    app.load().await;

    let json = body_json(get(app.router.clone(), "/health").await).await;
    assert_eq!(json["scripts"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = get(app.router.clone(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = get(app.router.clone(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
