//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **LogObserver**: 遷移を tracing のイベントとして出す
//! - **RecordingObserver**: 遷移を記録する（テスト・デモ用）

pub mod log_observer;
pub mod recording;

pub use self::log_observer::LogObserver;
pub use self::recording::RecordingObserver;
