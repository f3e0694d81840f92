//! Page/limit pagination helpers shared by the list endpoints.

/// Default number of scripts or history rows per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of rows a single page may request.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Default window for the "recently executed scripts" query.
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Convert a 1-based page number into a row offset.
///
/// Pages below 1 are treated as page 1.
pub fn page_offset(page: Option<i64>, limit: i64) -> i64 {
    let page = page.unwrap_or(1).max(1);
    (page - 1).saturating_mul(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 500), 20);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(9000), 20, 500), 500);
        assert_eq!(clamp_limit(Some(0), 20, 500), 1);
        assert_eq!(clamp_limit(Some(-3), 20, 500), 1);
    }

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_offset(None, 20), 0);
        assert_eq!(page_offset(Some(1), 20), 0);
        assert_eq!(page_offset(Some(0), 20), 0);
        assert_eq!(page_offset(Some(-4), 20), 0);
    }

    #[test]
    fn later_pages_skip_whole_pages() {
        assert_eq!(page_offset(Some(3), 20), 40);
    }
}
