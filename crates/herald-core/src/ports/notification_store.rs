//! NotificationStore port - the single source of truth for notifications.
//!
//! The store is owned by the notification center and only ever touched
//! under the center's lock, so the trait is synchronous.

use crate::domain::{Notification, NotificationKey, NotificationPatch};

/// NotificationStore は key でアドレス可能な順序付きコレクション
///
/// # 設計原則
/// - upsert は失敗しない（意味的な検証は呼び出し側の責任）
/// - `created` は新規作成時に一度だけ設定
/// - 容量を超えたら挿入順で最も古いものを捨てる
pub trait NotificationStore: Send {
    /// Create or merge. Returns the record after the merge.
    fn upsert(&mut self, key: NotificationKey, patch: NotificationPatch) -> Notification;

    fn get(&self, key: &NotificationKey) -> Option<&Notification>;

    /// All records, oldest first.
    fn list(&self) -> Vec<Notification>;

    /// Set `open` on an existing record. Returns false if the key is unknown.
    fn set_open(&mut self, key: &NotificationKey, open: bool) -> bool;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
