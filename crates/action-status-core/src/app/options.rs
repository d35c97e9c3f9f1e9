//! ActionOptions - tracker の設定

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options recognized by an `ActionStatus`.
///
/// On the wire the delay is given in milliseconds:
/// ```json
/// { "delay_timeout_ms": 300 }
/// ```
/// Missing fields fall back to [`ActionOptions::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    delay_timeout_ms: Option<u64>,
}

impl ActionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `Delayed` when an invocation has been pending this long.
    pub fn with_delay_timeout(mut self, delay: Duration) -> Self {
        self.delay_timeout_ms = Some(delay.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn without_delay_timeout(mut self) -> Self {
        self.delay_timeout_ms = None;
        self
    }

    /// The effective delay timeout. A zero delay counts as disabled.
    pub fn delay_timeout(&self) -> Option<Duration> {
        self.delay_timeout_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
