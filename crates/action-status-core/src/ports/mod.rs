//! Ports - 抽象化レイヤー
//!
//! tracker の外側にあるもの（包む非同期処理、時刻、ID 生成、遷移の通知先）を
//! trait として切り出しています。

pub mod clock;
pub mod id_generator;
pub mod observer;
pub mod operation;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::observer::StatusObserver;
pub use self::operation::{ActionHandler, HandlerOperation, Operation};
