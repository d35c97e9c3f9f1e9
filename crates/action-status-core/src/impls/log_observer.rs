//! LogObserver - 遷移を tracing に流す

use crate::domain::{Status, Transition};
use crate::ports::StatusObserver;

/// Emits one `tracing` event per transition.
///
/// Settled failures go out at `warn`, everything else at `debug`.
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    name: Option<String>,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag events with the action's name (e.g. `"search"`).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl StatusObserver for LogObserver {
    fn on_transition(&self, t: &Transition) {
        let action = self.name.as_deref().unwrap_or("action");
        match t.to {
            Status::Error => tracing::warn!(
                action,
                invocation = %t.invocation,
                from = %t.from,
                to = %t.to,
                "action failed"
            ),
            _ => tracing::debug!(
                action,
                invocation = %t.invocation,
                from = %t.from,
                to = %t.to,
                "status changed"
            ),
        }
    }
}
