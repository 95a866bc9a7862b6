//! Retention policy for the event log.

/// Configuration for event retention.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Events unchanged for this many days become deletable.
    pub days: u64,
    /// Enable the retention sweep.
    pub enabled: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: 90,
            enabled: false,
        }
    }
}

impl RetentionConfig {
    /// Change-date cutoff for a sweep running at `now` (Unix seconds).
    ///
    /// Returns `None` when retention is disabled or the horizon reaches
    /// before the epoch.
    pub fn cutoff(&self, now: u64) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        now.checked_sub(self.days * 24 * 3600)
    }
}
