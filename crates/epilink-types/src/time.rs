//! Wall-clock helpers.
//!
//! All timestamps in EpiLink are Unix seconds (`u64`). Services take explicit
//! `now` parameters where determinism matters; this helper is for callers at
//! the edge.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix timestamp in seconds.
///
/// Saturates to 0 if the system clock is before the epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now_is_recent() {
        // 2020-01-01 as a sanity floor
        assert!(unix_now() > 1_577_836_800);
    }
}
