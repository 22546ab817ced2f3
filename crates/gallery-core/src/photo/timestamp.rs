use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMs(i64);

impl TimestampMs {
    /// Unix epoch milliseconds (UTC)
    pub fn from_epoch_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// ISO-8601 rendering used by presentation layers.
    pub fn to_rfc3339(&self) -> Option<String> {
        DateTime::<Utc>::from_timestamp_millis(self.0).map(|dt| dt.to_rfc3339())
    }
}
