use std::path::PathBuf;

use devloop_core::discovery::expand_home;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8997;

/// Errors in the server environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("{var} must be a valid port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local single-user install.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8997`).
    pub port: u16,
    /// Allowed CORS origins. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Directory holding `config.json` and the default database.
    pub home_dir: PathBuf,
    /// SQLite connection URL.
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `HOST`                   | `127.0.0.1`                   |
    /// | `PORT` / `DEV_LOOP_PORT` | `8997`                        |
    /// | `CORS_ORIGINS`           | `*`                           |
    /// | `DEV_LOOP_HOME`          | `~/.dev-loop`                 |
    /// | `DATABASE_URL`           | `sqlite://<home>/devloop.db`  |
    pub fn from_env() -> Result<Self, ServerConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port = match port_var("PORT").or_else(|| port_var("DEV_LOOP_PORT")) {
            Some((var, value)) => value
                .parse()
                .map_err(|_| ServerConfigError::InvalidPort { var, value })?,
            None => DEFAULT_PORT,
        };

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let home_dir = std::env::var("DEV_LOOP_HOME")
            .map(|h| expand_home(&h))
            .unwrap_or_else(|_| expand_home("~/.dev-loop"));

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| default_database_url(&home_dir));

        Ok(Self {
            host,
            port,
            cors_origins,
            home_dir,
            database_url,
        })
    }

    /// Path of the `config.json` file.
    pub fn config_path(&self) -> PathBuf {
        self.home_dir.join("config.json")
    }
}

fn port_var(var: &'static str) -> Option<(&'static str, String)> {
    std::env::var(var).ok().map(|value| (var, value))
}

fn default_database_url(home_dir: &std::path::Path) -> String {
    format!("sqlite://{}", home_dir.join("devloop.db").display())
}
