//! Folder loader: scan script folders and rebuild the catalog.

use std::collections::HashSet;

use devloop_core::config::DevLoopConfig;
use devloop_core::discovery::{merge_folders, scan_folders};
use devloop_core::error::CoreError;
use devloop_db::repositories::ScriptRepo;
use devloop_db::DbPool;

use crate::error::AppResult;

/// Replace the catalog with the scripts found under `requested` plus the
/// configured folders. Returns the number of scripts indexed.
///
/// The walk happens before the catalog is cleared, so a slow scan never
/// leaves the catalog empty longer than the writes take. Clear and
/// repopulate are not one transaction.
pub async fn load_folders(
    pool: &DbPool,
    settings: &DevLoopConfig,
    requested: &[String],
) -> AppResult<usize> {
    if requested.iter().all(|f| f.trim().is_empty()) {
        return Err(CoreError::Validation("folders must not be empty".to_string()).into());
    }

    let folders = merge_folders(requested, &settings.script_folders);
    let scripts = scan_folders(&folders, &settings.extension_commands).await;

    let removed = ScriptRepo::clear(pool).await?;

    let mut seen = HashSet::new();
    for script in &scripts {
        if seen.insert(script.id.as_str()) {
            ScriptRepo::save(pool, script).await?;
        }
    }

    tracing::info!(
        folders = folders.len(),
        removed,
        indexed = seen.len(),
        "Script catalog reloaded",
    );

    Ok(seen.len())
}
