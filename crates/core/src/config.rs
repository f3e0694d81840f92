//! The dev-loop configuration file (`config.json`).
//!
//! Holds the default script folders, the extension → interpreter mapping,
//! and extra environment variables for script runs. The file is read once at
//! startup and rewritten only through [`DevLoopConfig::save`]; the running
//! service owns the loaded value and swaps it on save.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::metadata::extension_of;

/// Default editor command, kept for compatibility with existing config files.
pub const DEFAULT_EDITOR: &str = "code";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-editable service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevLoopConfig {
    #[serde(default)]
    pub script_folders: Vec<String>,
    #[serde(default)]
    pub extension_commands: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub editor: String,
}

impl Default for DevLoopConfig {
    fn default() -> Self {
        let extension_commands = [
            (".py", "python"),
            (".js", "node"),
            (".ts", "ts-node"),
            (".go", "go run"),
            (".sh", "bash"),
            (".bash", "bash"),
            (".zsh", "zsh"),
            (".zx", "zx"),
        ]
        .into_iter()
        .map(|(ext, cmd)| (ext.to_string(), cmd.to_string()))
        .collect();

        Self {
            script_folders: vec!["~/.dev-loop/scripts".to_string()],
            extension_commands,
            environment_variables: BTreeMap::new(),
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl DevLoopConfig {
    /// Fill empty folder lists, extension maps, and editor with defaults.
    pub fn with_fallbacks(mut self) -> Self {
        let defaults = Self::default();
        if self.script_folders.is_empty() {
            self.script_folders = defaults.script_folders;
        }
        if self.extension_commands.is_empty() {
            self.extension_commands = defaults.extension_commands;
        }
        if self.editor.is_empty() {
            self.editor = defaults.editor;
        }
        self
    }

    /// Interpreter command configured for a script path's extension.
    pub fn command_for(&self, script_path: &str) -> Option<&str> {
        self.extension_commands
            .get(&extension_of(script_path))
            .map(String::as_str)
    }

    /// Read the config file, creating it with defaults when it does not exist.
    pub async fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let config: Self = serde_json::from_slice(&bytes)?;
                Ok(config.with_fallbacks())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save(path).await?;
                tracing::info!(path = %path.display(), "Created default config file");
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the config file as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
