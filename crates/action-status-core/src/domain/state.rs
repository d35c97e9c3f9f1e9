//! State - アクションの状態
//!
//! `Status` が唯一の正本で、`is_pending` などの述語はすべてここから導出します。

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::InvocationId;

/// Status of the tracked action.
///
/// State transitions:
/// - Idle -> Pending (first `action` call)
/// - Pending -> Delayed (delay timeout elapsed, invocation still active)
/// - Pending | Delayed -> Done | Error (operation settled)
/// - any non-idle -> Pending (newer `action` call supersedes)
///
/// `Idle` is only the initial state and is never re-entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No invocation has started yet.
    #[default]
    Idle,

    /// An invocation is in flight.
    Pending,

    /// An invocation is in flight and has outlived the delay timeout.
    Delayed,

    /// The latest invocation succeeded.
    Done,

    /// The latest invocation failed.
    Error,
}

impl Status {
    pub fn is_pending(self) -> bool {
        matches!(self, Status::Pending | Status::Delayed)
    }

    pub fn is_delayed(self) -> bool {
        self == Status::Delayed
    }

    pub fn is_error(self) -> bool {
        self == Status::Error
    }

    pub fn is_success(self) -> bool {
        self == Status::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Pending => "pending",
            Status::Delayed => "delayed",
            Status::Done => "done",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The invocation that caused the change.
    pub invocation: InvocationId,
    pub from: Status,
    pub to: Status,
    pub at: DateTime<Utc>,
}

/// Reactive state as published to subscribers.
///
/// `error` is shared with the `ActionError::Failed` that settled the same
/// invocation, so both point at the same value.
#[derive(Debug)]
pub struct Snapshot<E> {
    pub status: Status,
    pub error: Option<Arc<E>>,
    /// Invocation that last mutated this snapshot. `None` while idle.
    pub invocation: Option<InvocationId>,
    pub updated_at: DateTime<Utc>,
}

impl<E> Snapshot<E> {
    pub(crate) fn idle(at: DateTime<Utc>) -> Self {
        Self {
            status: Status::Idle,
            error: None,
            invocation: None,
            updated_at: at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn is_delayed(&self) -> bool {
        self.status.is_delayed()
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

// derive(Clone) would require `E: Clone`.
impl<E> Clone for Snapshot<E> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            error: self.error.clone(),
            invocation: self.invocation,
            updated_at: self.updated_at,
        }
    }
}

/// Serializable view of a [`Snapshot`] for status endpoints and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub status: Status,
    pub is_pending: bool,
    pub is_delayed: bool,
    pub is_error: bool,
    pub is_success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation: Option<InvocationId>,

    pub updated_at_ms: i64,
}

impl<E: fmt::Display> From<&Snapshot<E>> for StatusView {
    fn from(snapshot: &Snapshot<E>) -> Self {
        Self {
            status: snapshot.status,
            is_pending: snapshot.is_pending(),
            is_delayed: snapshot.is_delayed(),
            is_error: snapshot.is_error(),
            is_success: snapshot.is_success(),
            error: snapshot.error.as_ref().map(|e| e.to_string()),
            invocation: snapshot.invocation,
            updated_at_ms: snapshot.updated_at.timestamp_millis(),
        }
    }
}
