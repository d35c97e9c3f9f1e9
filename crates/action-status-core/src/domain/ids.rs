//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type パターンで型付けしています。
//! 現在のマーカーは `Invocation` のみですが、`Id<T>` 側に共通実装を
//! 置いておけば、別の ID 種別を増やしてもコードは重複しません。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **調整なしで生成可能**: カウンタ共有なしで一意になる
//! - **UUID互換**: 128-bit で UUID と同じサイズ

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"inv-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Invocation のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Invocation {}

impl IdMarker for Invocation {
    fn prefix() -> &'static str {
        "inv-"
    }
}

/// Identifier of one invocation (one call to `action`).
///
/// Continuations capture this and compare it against the tracker's active
/// invocation before touching shared state.
pub type InvocationId = Id<Invocation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        let ulid = Ulid::new();
        let id = InvocationId::from_ulid(ulid);

        assert_eq!(id.as_ulid(), ulid);
        assert_eq!(id.to_string(), format!("inv-{ulid}"));
    }

    #[test]
    fn ulid_ids_are_sortable() {
        use crate::ports::{FixedClock, IdGenerator, UlidGenerator};
        use chrono::{TimeZone, Utc};

        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let t2 = t1 + chrono::Duration::milliseconds(1);

        let id1 = UlidGenerator::new(FixedClock::new(t1)).generate_invocation_id();
        let id2 = UlidGenerator::new(FixedClock::new(t2)).generate_invocation_id();

        // ランダム部に関係なく、timestamp が先に効く
        assert!(id1 < id2);
    }

    #[test]
    fn ids_can_be_serialized() {
        let id = InvocationId::from_ulid(Ulid::new());

        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: InvocationId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(id, deserialized);
        assert!(!serialized.contains("_marker"));
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<InvocationId>(), size_of::<Ulid>());
    }
}
