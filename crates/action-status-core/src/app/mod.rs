//! App - アプリケーション層
//!
//! ports を組み合わせて tracker 本体を実装します。
//!
//! # 主要コンポーネント
//! - **ActionStatus**: 状態機械・supersede・delay timer・teardown
//! - **ActionStatusBuilder**: 構築とワイヤリング
//! - **ActionOptions**: 設定（delay timeout）

pub mod builder;
pub mod options;
pub mod tracker;

pub use self::builder::ActionStatusBuilder;
pub use self::options::ActionOptions;
pub use self::tracker::{ActionStatus, PendingAction};
