use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::SessionConfig;

/// Identifier of one passthrough session. Doubles as the stop handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Outcome of a session that ended without error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub config: SessionConfig,
    pub started_at: DateTime<Utc>,
    pub sample_rate_hz: u32,
    pub buffer_size: usize,
    /// Complete frames written to playback.
    pub frames: u64,
    pub bytes_captured: u64,
    pub bytes_played: u64,
    /// Bytes of a partially filled frame dropped at cancellation.
    pub bytes_discarded: u64,
    pub duration_secs: f64,
}
