//! In-memory notification store.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::domain::{Notification, NotificationKey, NotificationPatch};
use crate::ports::{Clock, NotificationStore};

/// Default capacity of the feed.
pub const MAX_NOTIFICATIONS: usize = 100;

/// InMemoryNotificationStore keeps records in insertion order.
///
/// # 実装詳細
/// - IndexMap<NotificationKey, Notification>: key lookup + 挿入順
/// - 既存 key の更新は位置を変えない（eviction は「最後に触った」ではなく「最初に入れた」順）
pub struct InMemoryNotificationStore {
    records: IndexMap<NotificationKey, Notification>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryNotificationStore {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: IndexMap::new(),
            capacity,
            clock,
        }
    }

    fn evict_overflow(&mut self) {
        while self.records.len() > self.capacity {
            if let Some((key, _)) = self.records.shift_remove_index(0) {
                tracing::debug!(key = %key, "evicted oldest notification");
            }
        }
    }
}

impl NotificationStore for InMemoryNotificationStore {
    fn upsert(&mut self, key: NotificationKey, patch: NotificationPatch) -> Notification {
        let record = match self.records.get_mut(&key) {
            Some(existing) => {
                existing.apply(patch);
                existing.clone()
            }
            None => {
                let mut record = Notification::new(key.clone(), self.clock.now());
                record.apply(patch);
                self.records.insert(key, record.clone());
                record
            }
        };
        self.evict_overflow();
        record
    }

    fn get(&self, key: &NotificationKey) -> Option<&Notification> {
        self.records.get(key)
    }

    fn list(&self) -> Vec<Notification> {
        self.records.values().cloned().collect()
    }

    fn set_open(&mut self, key: &NotificationKey, open: bool) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.open = open;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackgroundTaskPatch, Content, TaskStatus};
    use crate::ports::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    fn store_with_clock() -> (InMemoryNotificationStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        (InMemoryNotificationStore::new(MAX_NOTIFICATIONS, clock.clone()), clock)
    }

    #[test]
    fn upsert_twice_keeps_one_record_and_created() {
        let (mut store, clock) = store_with_clock();
        let key = NotificationKey::from("k");

        let first = store.upsert(key.clone(), NotificationPatch::new().message("m"));
        clock.advance(Duration::seconds(30));
        let second = store.upsert(key.clone(), NotificationPatch::new().message("m"));

        assert_eq!(store.len(), 1);
        assert_eq!(first.created, second.created);
        assert_eq!(second.message, Some(Content::text("m")));
    }

    #[test]
    fn merge_keeps_status_when_only_percent_is_sent() {
        let (mut store, _) = store_with_clock();
        let key = NotificationKey::from("k");

        store.upsert(
            key.clone(),
            NotificationPatch::new()
                .background_task(BackgroundTaskPatch::with_status(TaskStatus::Pending).percent(10.0)),
        );
        let record = store.upsert(
            key,
            NotificationPatch::new().background_task(BackgroundTaskPatch::new().percent(20.0)),
        );

        let task = record.background_task.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.percent, Some(20.0));
    }

    #[test]
    fn evicts_the_earliest_inserted_not_the_least_recently_touched() {
        let (mut store, _) = store_with_clock();
        for i in 0..MAX_NOTIFICATIONS {
            store.upsert(NotificationKey::from(format!("n{i}")), NotificationPatch::new());
        }
        // touch the oldest; it must still be the one evicted
        store.upsert(NotificationKey::from("n0"), NotificationPatch::new().message("touched"));
        store.upsert(NotificationKey::from("n100"), NotificationPatch::new());

        assert_eq!(store.len(), MAX_NOTIFICATIONS);
        assert!(store.get(&NotificationKey::from("n0")).is_none());
        assert!(store.get(&NotificationKey::from("n1")).is_some());
        assert!(store.get(&NotificationKey::from("n100")).is_some());

        let list = store.list();
        assert_eq!(list.first().unwrap().key.as_str(), "n1");
        assert_eq!(list.last().unwrap().key.as_str(), "n100");
    }

    #[test]
    fn set_open_and_clear() {
        let (mut store, _) = store_with_clock();
        let key = NotificationKey::from("k");
        store.upsert(key.clone(), NotificationPatch::new().open(true));

        assert!(store.set_open(&key, false));
        assert!(!store.get(&key).unwrap().open);
        assert!(!store.set_open(&NotificationKey::from("missing"), false));

        store.clear();
        assert!(store.is_empty());
    }
}
