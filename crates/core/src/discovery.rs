//! Script folder discovery.
//!
//! Walks configured script folders, filters files by extension, and parses
//! each file's annotations. A single unreadable file or folder never aborts
//! the scan: it is logged and skipped.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::metadata::{extension_of, parse_script, ScriptDescriptor};

/// Union of the requested and configured folders.
///
/// Duplicates are collapsed; the first occurrence keeps its position, with
/// requested folders ahead of configured ones.
pub fn merge_folders(requested: &[String], configured: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .chain(configured.iter())
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .filter(|f| seen.insert(f.to_string()))
        .map(str::to_string)
        .collect()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(folder: &str) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (folder.strip_prefix('~'), home) {
        (Some(""), Some(home)) => PathBuf::from(home),
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            PathBuf::from(home).join(&rest[1..])
        }
        _ => PathBuf::from(folder),
    }
}

/// Whether a file should be indexed under the given extension mapping.
///
/// An empty mapping accepts every file.
pub fn is_indexable(path: &str, extension_commands: &BTreeMap<String, String>) -> bool {
    extension_commands.is_empty() || extension_commands.contains_key(&extension_of(path))
}

/// Scan every folder recursively and return the parsed descriptors.
///
/// Descriptors come back with their category defaulted, ready to be stored.
/// Folders are visited in the given order; entries within a directory are
/// visited in file-name order.
pub async fn scan_folders(
    folders: &[String],
    extension_commands: &BTreeMap<String, String>,
) -> Vec<ScriptDescriptor> {
    let mut scripts = Vec::new();

    for folder in folders {
        let root = expand_home(folder);
        let root = std::path::absolute(&root).unwrap_or(root);

        if let Err(e) = scan_recursive(&root, extension_commands, &mut scripts).await {
            tracing::warn!(folder = %root.display(), error = %e, "Skipping unreadable script folder");
        }
    }

    scripts
}

async fn scan_recursive(
    dir: &Path,
    extension_commands: &BTreeMap<String, String>,
    scripts: &mut Vec<ScriptDescriptor>,
) -> std::io::Result<()> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        entries.push(entry);
    }
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping entry");
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(e) = Box::pin(scan_recursive(&path, extension_commands, scripts)).await {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable directory");
            }
            continue;
        }

        let path_str = path.to_string_lossy().into_owned();
        if !is_indexable(&path_str, extension_commands) {
            continue;
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                scripts.push(parse_script(&path_str, &content).with_default_category());
            }
            Err(e) => {
                tracing::debug!(path = %path_str, error = %e, "Skipping unreadable file");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
