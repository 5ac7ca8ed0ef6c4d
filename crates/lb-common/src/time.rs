//! Unix timestamp helpers
//!
//! Entities carry timestamps as unix seconds. `-1` marks an open bound on
//! validity windows and unlimited quotas.

use chrono::Utc;

/// Sentinel for "no bound" (window edges, max views, max uses).
pub const UNBOUNDED: i64 = -1;

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Whether a bound value is set (anything but the `-1` sentinel).
pub fn is_bounded(value: i64) -> bool {
    value != UNBOUNDED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now_is_positive() {
        assert!(unix_now() > 1_600_000_000);
    }

    #[test]
    fn test_is_bounded() {
        assert!(!is_bounded(UNBOUNDED));
        assert!(is_bounded(0));
        assert!(is_bounded(42));
    }
}
