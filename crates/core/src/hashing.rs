//! Shared SHA-256 hex digest utility.
//!
//! Script ids are derived from the script's path, never from its content, so
//! editing a script keeps its id (and its execution history) stable.

use sha2::{Digest, Sha256};

use crate::types::ScriptId;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Stable script id for a filesystem path.
pub fn script_id_for_path(path: &str) -> ScriptId {
    sha256_hex(path.as_bytes())
}
