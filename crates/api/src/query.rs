//! Shared query parameter types for API handlers.

use serde::{Deserialize, Deserializer};

/// Page-based pagination (`?page=&limit=`), 1-based pages.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /api/scripts` filters.
#[derive(Debug, Default, Deserialize)]
pub struct ScriptListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// A bare `?limit=`.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `?incognito=true` on the execute action.
#[derive(Debug, Default, Deserialize)]
pub struct IncognitoParams {
    #[serde(default, deserialize_with = "flag")]
    pub incognito: bool,
}

/// `?rm=true` on script deletion also removes the file.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveFileParams {
    #[serde(default, deserialize_with = "flag")]
    pub rm: bool,
}

/// A query flag is set only by `true` (any case); every other value is unset.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    fn incognito(query: &str) -> bool {
        let uri: Uri = format!("/x{query}").parse().unwrap();
        Query::<IncognitoParams>::try_from_uri(&uri).unwrap().0.incognito
    }

    #[test]
    fn flags_accept_any_value() {
        assert!(incognito("?incognito=true"));
        assert!(incognito("?incognito=TRUE"));
        assert!(!incognito("?incognito=1"));
        assert!(!incognito("?incognito=no"));
        assert!(!incognito("?incognito="));
        assert!(!incognito(""));
    }

    #[test]
    fn remove_flag_uses_same_rule() {
        let uri: Uri = "/x?rm=True".parse().unwrap();
        assert!(Query::<RemoveFileParams>::try_from_uri(&uri).unwrap().0.rm);
    }
}
