use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

/// Settings for how the game interprets calendar days.
#[derive(Debug, Clone, Deserialize)]
pub struct GameSettings {
    /// Offset from UTC of the local day used for betting windows and day buckets.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl GameSettings {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    /// Falls back to UTC when the configured offset is out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| {
            tracing::warn!(
                "Invalid UTC offset of {} minutes configured, falling back to UTC",
                self.utc_offset_minutes
            );
            Utc.fix()
        })
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(0)
    }
}
