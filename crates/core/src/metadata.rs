//! Script metadata annotation parser.
//!
//! Scripts describe themselves with `@key: value` comments near the top of the
//! file:
//!
//! ```text
//! # @name: Deploy preview
//! # @description: Build and push a preview environment
//! # @category: deploy
//! # @tags: ["ci", "preview"]
//! # @inputs: [
//! #   {"name": "branch", "type": "string", "required": true}
//! # ]
//! ```
//!
//! The comment marker depends on the file extension (`#` or `//`). Parsing
//! never fails: malformed JSON leaves the field empty and a missing name falls
//! back to the file's base name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hashing::script_id_for_path;
use crate::types::ScriptId;

/// Category assigned to scripts that do not declare one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// One declared parameter of a script (`@inputs` entry).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputField {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    /// Untyped default value, passed through as-is.
    pub default: Value,
}

/// Parsed metadata for one script file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    pub id: ScriptId,
    pub name: String,
    pub description: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub inputs: Vec<InputField>,
    pub path: String,
}

impl ScriptDescriptor {
    /// Replace a blank category with [`DEFAULT_CATEGORY`].
    pub fn with_default_category(mut self) -> Self {
        if self.category.trim().is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        self
    }
}

/// Comment syntax used for annotations, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `# @key: value` (Python, shell, and anything unrecognised).
    Hash,
    /// `// @key: value` (JavaScript, TypeScript, Go, zx).
    DoubleSlash,
}

impl CommentStyle {
    /// Pick the comment style for a script path.
    pub fn for_path(path: &str) -> Self {
        match extension_of(path).as_str() {
            ".js" | ".ts" | ".go" | ".zx" => Self::DoubleSlash,
            _ => Self::Hash,
        }
    }

    /// Prefix that introduces an annotation line.
    pub fn annotation_prefix(self) -> &'static str {
        match self {
            Self::Hash => "# @",
            Self::DoubleSlash => "// @",
        }
    }

    /// Bare comment marker stripped from continuation lines of a block.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Hash => "#",
            Self::DoubleSlash => "//",
        }
    }
}

/// File extension including the leading dot (`".py"`), or empty.
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Parse the annotation comments of a script into a [`ScriptDescriptor`].
///
/// The returned descriptor carries the path-derived `id` and the `path`
/// itself. The category is left as written; callers that index the script
/// apply [`ScriptDescriptor::with_default_category`].
pub fn parse_script(path: &str, content: &str) -> ScriptDescriptor {
    let style = CommentStyle::for_path(path);
    let prefix = style.annotation_prefix();

    let mut script = ScriptDescriptor {
        id: script_id_for_path(path),
        path: path.to_string(),
        ..Default::default()
    };

    // Lines collected while inside a multi-line `@inputs: [` block.
    let mut block: Option<Vec<String>> = None;

    for line in content.lines() {
        if let Some(lines) = block.as_mut() {
            let stripped = line.strip_prefix(style.marker()).unwrap_or(line).trim();
            lines.push(stripped.to_string());
            if stripped.contains(']') {
                let joined = lines.join("\n");
                script.inputs = parse_json_array(joined.trim());
                block = None;
            }
            continue;
        }

        let Some(annotation) = line.strip_prefix(prefix) else {
            continue;
        };

        if let Some(value) = annotation.strip_prefix("name:") {
            script.name = value.trim().to_string();
        } else if let Some(value) = annotation.strip_prefix("description:") {
            script.description = value.trim().to_string();
        } else if let Some(value) = annotation.strip_prefix("author:") {
            script.author = value.trim().to_string();
        } else if let Some(value) = annotation.strip_prefix("category:") {
            script.category = value.trim().to_string();
        } else if let Some(value) = annotation.strip_prefix("tags:") {
            script.tags = parse_json_array(value.trim());
        } else if let Some(value) = annotation.strip_prefix("inputs:") {
            let value = value.trim();
            if value.starts_with('[') && !value.ends_with(']') {
                block = Some(vec![value.to_string()]);
            } else {
                script.inputs = parse_json_array(value);
            }
        }
    }

    if block.is_some() {
        tracing::debug!(path, "Unterminated @inputs block, inputs ignored");
    }

    if script.name.is_empty() {
        script.name = base_name(path);
    }

    script
}

/// Decode a JSON array, yielding an empty list on malformed input.
fn parse_json_array<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str::<Option<Vec<T>>>(raw)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
