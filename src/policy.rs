//! Freshness policy: decides what to do with whatever the store returned.

/// Entries younger than this many milliseconds are served without refreshing.
pub const FRESH_WINDOW_MS: i64 = 120_000;

/// Classification of the cached entry for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Entry exists and is inside the freshness window.
    Fresh,
    /// Entry exists but is at or past the freshness window.
    /// Serve it and refresh in the background.
    NeedsRefresh,
    /// No entry. The caller has to block on a synchronous fetch.
    Absent,
}

impl Classification {
    pub fn needs_refresh(self) -> bool {
        matches!(self, Classification::NeedsRefresh)
    }
}

/// Classify an entry by its fetch timestamp.
///
/// `entry_timestamp` is `None` when the store had nothing under the key. The
/// timestamp comes from the store as-is, so the age saturates instead of overflowing.
pub fn classify(entry_timestamp: Option<i64>, now_ms: i64) -> Classification {
    match entry_timestamp {
        None => Classification::Absent,
        Some(timestamp) if now_ms.saturating_sub(timestamp) >= FRESH_WINDOW_MS => {
            Classification::NeedsRefresh
        }
        Some(_) => Classification::Fresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_absent() {
        let c = classify(None, NOW);
        assert_eq!(c, Classification::Absent);
        assert!(!c.needs_refresh());
    }

    #[test]
    fn test_fresh_inside_window() {
        assert_eq!(classify(Some(NOW), NOW), Classification::Fresh);
        assert_eq!(
            classify(Some(NOW - FRESH_WINDOW_MS + 1), NOW),
            Classification::Fresh
        );
    }

    #[test]
    fn test_window_boundary_needs_refresh() {
        let c = classify(Some(NOW - FRESH_WINDOW_MS), NOW);
        assert_eq!(c, Classification::NeedsRefresh);
        assert!(c.needs_refresh());
    }

    #[test]
    fn test_old_entry_needs_refresh() {
        assert_eq!(
            classify(Some(NOW - 150_000), NOW),
            Classification::NeedsRefresh
        );
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        // Clock skew between instances sharing a store.
        assert_eq!(classify(Some(NOW + 5_000), NOW), Classification::Fresh);
    }

    #[test]
    fn test_minimum_timestamp_needs_refresh() {
        assert_eq!(classify(Some(i64::MIN), NOW), Classification::NeedsRefresh);
    }

    #[test]
    fn test_maximum_timestamp_is_fresh() {
        assert_eq!(classify(Some(i64::MAX), NOW), Classification::Fresh);
        assert_eq!(classify(Some(i64::MAX), i64::MIN), Classification::Fresh);
    }
}
