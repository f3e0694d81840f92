#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use devloop_core::config::DevLoopConfig;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use devloop_api::config::ServerConfig;
use devloop_api::router::build_app_router;
use devloop_api::state::AppState;

/// Build a test `ServerConfig` rooted at `home`.
pub fn test_config(home: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        home_dir: home.to_path_buf(),
        database_url: "sqlite::memory:".to_string(),
    }
}

/// Settings that never touch the real `~/.dev-loop`: no configured folders
/// and `.sh` scripts run with `sh`.
pub fn test_settings() -> DevLoopConfig {
    DevLoopConfig {
        script_folders: vec![],
        extension_commands: BTreeMap::from([(".sh".to_string(), "sh".to_string())]),
        environment_variables: BTreeMap::new(),
        editor: String::new(),
    }
}

/// A router plus the temp directories it works in.
pub struct TestApp {
    pub router: Router,
    /// Holds `config.json`.
    pub home: tempfile::TempDir,
    /// Where tests write their scripts.
    pub scripts: tempfile::TempDir,
}

impl TestApp {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_settings(pool, test_settings())
    }

    pub fn with_settings(pool: SqlitePool, settings: DevLoopConfig) -> Self {
        let home = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();
        let config = test_config(home.path());
        let state = AppState::new(pool, config.clone(), settings);
        Self {
            router: build_app_router(state, &config),
            home,
            scripts,
        }
    }

    /// Write a script file under the scripts dir and return its path.
    pub fn write_script(&self, rel: &str, body: &str) -> String {
        let path = self.scripts.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    pub fn scripts_dir(&self) -> String {
        self.scripts.path().to_string_lossy().into_owned()
    }

    /// Load the scripts dir into the catalog.
    pub async fn load(&self) -> serde_json::Value {
        let body = serde_json::json!({ "folders": [self.scripts_dir()] });
        let response = post_json(self.router.clone(), "/api/actions/scripts/load", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    /// Look up a loaded script's id by name.
    pub async fn script_id(&self, name: &str) -> String {
        let response = get(self.router.clone(), "/api/scripts?limit=500").await;
        let list = body_json(response).await;
        list.as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == name)
            .unwrap_or_else(|| panic!("script {name} not loaded"))["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Execute a script and return (status, body text).
    pub async fn exec(
        &self,
        id: &str,
        query: &str,
        body: serde_json::Value,
    ) -> (StatusCode, String) {
        let uri = format!("/api/actions/exec/scripts/{id}{query}");
        let response = post_json(self.router.clone(), &uri, body).await;
        let status = response.status();
        (status, body_text(response).await)
    }

    /// History records for one script, newest first.
    pub async fn history(&self, id: &str) -> Vec<serde_json::Value> {
        let response = get(self.router.clone(), &format!("/api/history/scripts/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await.as_array().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
