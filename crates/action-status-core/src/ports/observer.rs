//! StatusObserver port - 状態遷移の通知先
//!
//! ホスト側（UI コンポーネントなど）はここで遷移を受け取り、再描画します。
//! 値を読み直すだけなら `ActionStatus::subscribe()` の watch で十分です。

use crate::domain::Transition;

/// Receives every status transition, in order.
///
/// Called synchronously while the tracker's state lock is held: keep it
/// cheap and never call back into the tracker from here.
pub trait StatusObserver: Send + Sync {
    fn on_transition(&self, transition: &Transition);
}
