//! Errors - `action` の失敗と構築時エラー
//!
//! 本物の失敗（operation が返したエラー）と合成シグナル（supersede / unmount）を
//! variant で区別します。文字列だけでは区別できないためです。

use std::sync::Arc;

use thiserror::Error;

/// Sentinel reason carried by a superseded invocation.
pub const CANCEL_PENDING: &str = "cancel_pending";

/// Sentinel reason carried by an invocation still active at disposal.
pub const UNMOUNT: &str = "unmount";

/// Why a `PendingAction` was rejected.
///
/// Only `Failed` (and `Panicked`) correspond to a status of `Error`; the
/// synthetic variants never touch the reactive status or error.
#[derive(Debug, Error)]
pub enum ActionError<E> {
    /// The wrapped operation failed. Same value as the tracker's `error()`.
    #[error("operation failed: {0}")]
    Failed(Arc<E>),

    /// A newer `action` call started before this one settled.
    #[error("superseded by a newer invocation (cancel_pending)")]
    Superseded,

    /// The tracker was disposed while this invocation was active.
    #[error("tracker disposed (unmount)")]
    Unmounted,

    /// The operation's future panicked.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl<E> ActionError<E> {
    /// The sentinel reason for synthetic rejections, `None` otherwise.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ActionError::Superseded => Some(CANCEL_PENDING),
            ActionError::Unmounted => Some(UNMOUNT),
            ActionError::Failed(_) | ActionError::Panicked(_) => None,
        }
    }

    /// Superseded or unmounted: the caller should simply drop the result.
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// The operation error, if this is a genuine failure.
    pub fn operation_error(&self) -> Option<&Arc<E>> {
        match self {
            ActionError::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// derive(Clone) would require `E: Clone`.
impl<E> Clone for ActionError<E> {
    fn clone(&self) -> Self {
        match self {
            ActionError::Failed(e) => ActionError::Failed(Arc::clone(e)),
            ActionError::Superseded => ActionError::Superseded,
            ActionError::Unmounted => ActionError::Unmounted,
            ActionError::Panicked(msg) => ActionError::Panicked(msg.clone()),
        }
    }
}

/// BuildError は tracker 構築時のエラー
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no tokio runtime available; build inside a runtime or pass one with `runtime()`")]
    NoRuntime,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
