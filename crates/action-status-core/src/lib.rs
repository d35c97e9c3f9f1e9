//! action-status-core
//!
//! Status tracking for one re-invocable asynchronous action:
//! `idle → pending → (delayed) → done | error`, with stale invocations
//! superseded so only the latest call's outcome is observable.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, status, errors）
//! - **ports**: 抽象化レイヤー（Operation, ActionHandler, StatusObserver, Clock, IdGenerator）
//! - **app**: tracker 本体（ActionStatus, builder, options）
//! - **impls**: ports の実装（LogObserver, RecordingObserver）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ActionOptions, ActionStatus, ActionStatusBuilder, PendingAction};
pub use domain::{ActionError, BuildError, InvocationId, Snapshot, Status, StatusView, Transition};
