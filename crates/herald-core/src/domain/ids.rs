//! Domain identifiers (strongly-typed string keys).
//!
//! Notification keys are usually chosen by the caller (`"clone:1"`), task ids
//! are assigned by the server and topics are agreed upon between the stream
//! subscriber and whoever listens on the side channel. All three are plain
//! strings on the wire, so they share one generic `Key<T>` with a phantom
//! marker to keep them from being mixed up.
//!
//! ## Phantom Type パターン
//! `T` は実行時には使わないマーカー型です。`NotificationKey` と `TaskId` は
//! 同じ表現でも別の型になり、取り違えはコンパイルエラーになります。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// KeyMarker は各 key 型のマーカー trait
///
/// `prefix()` is only used for generated keys; caller-supplied keys are kept
/// verbatim.
pub trait KeyMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key<T: KeyMarker> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T: KeyMarker> Key<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// Build a generated key: `{prefix}{ulid}`.
    pub fn generated(ulid: Ulid) -> Self {
        Self::new(format!("{}{}", T::prefix(), ulid))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.value.starts_with(prefix)
    }
}

impl<T: KeyMarker> From<&str> for Key<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: KeyMarker> From<String> for Key<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: KeyMarker> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: KeyMarker> Serialize for Key<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: KeyMarker> Deserialize<'de> for Key<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedEntry {}

impl KeyMarker for FeedEntry {
    fn prefix() -> &'static str {
        "notification-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServerTask {}

impl KeyMarker for ServerTask {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalTopic {}

impl KeyMarker for SignalTopic {
    fn prefix() -> &'static str {
        "topic-"
    }
}

/// Identity of a notification inside the store.
pub type NotificationKey = Key<FeedEntry>;

/// Server-assigned id correlating a background task with its event stream.
pub type TaskId = Key<ServerTask>;

/// Side-channel topic published when a streamed task completes.
pub type Topic = Key<SignalTopic>;

/// Well-known side-channel topics.
pub mod topics {
    /// Image list collaborators refresh when a rescan task is done.
    pub const IMAGE_RESCANNED: &str = "image-rescanned";
}
