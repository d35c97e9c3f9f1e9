//! RecordingObserver - 遷移をそのまま溜める

use std::sync::{Mutex, PoisonError};

use crate::domain::{Status, Transition};
use crate::ports::StatusObserver;

/// Keeps every transition in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    transitions: Mutex<Vec<Transition>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Visited statuses, starting with the first `from`.
    ///
    /// e.g. `[Idle, Pending, Done]` for one successful call.
    pub fn statuses(&self) -> Vec<Status> {
        let transitions = self.transitions();
        let mut out = Vec::with_capacity(transitions.len() + 1);
        if let Some(first) = transitions.first() {
            out.push(first.from);
        }
        out.extend(transitions.iter().map(|t| t.to));
        out
    }
}

impl StatusObserver for RecordingObserver {
    fn on_transition(&self, transition: &Transition) {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*transition);
    }
}
