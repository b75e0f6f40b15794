//! NotificationCenter - the public facade.
//!
//! `upsert_notification` is synchronous. It merges the patch into the store,
//! applies the status override, decides whether the change is shown, and
//! then lets the subscription driver pick up any new promise or task stream.
//! The state lock is released before the presenter, the desktop bridge or the
//! driver run.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, trace};

use super::desktop_bridge::DesktopNotificationBridge;
use super::driver::SubscriptionDriver;
use super::resolver::StatusOverrideResolver;
use crate::domain::{Notification, NotificationKey, NotificationPatch};
use crate::observability::StatusCounts;
use crate::ports::{DismissHandle, KeyGenerator, NotificationStore, Presenter};

/// Per-call switches for internal updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOptions {
    /// Do not apply `on_change` for the resulting status.
    pub skip_override_by_status: bool,
    /// Do not mirror this change to the desktop.
    pub skip_desktop_notification: bool,
}

impl UpsertOptions {
    /// Settlement updates carry their overrides already.
    pub fn settlement() -> Self {
        Self {
            skip_override_by_status: true,
            skip_desktop_notification: false,
        }
    }

    /// Progress ticks are never mirrored to the desktop. The pending
    /// override still runs so it can render the new percent.
    pub fn progress() -> Self {
        Self {
            skip_override_by_status: false,
            skip_desktop_notification: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reflection {
    Show,
    Close,
    Silent,
}

impl Reflection {
    /// `open: false` always closes. Otherwise a change is shown when it opens
    /// the notification or touches one that is already shown.
    fn decide(open: Option<bool>, active: bool) -> Self {
        match open {
            Some(false) => Self::Close,
            Some(true) => Self::Show,
            None if active => Self::Show,
            None => Self::Silent,
        }
    }
}

struct CenterState {
    store: Box<dyn NotificationStore>,
    active: HashSet<NotificationKey>,
}

struct Inner {
    state: Mutex<CenterState>,
    keys: Arc<dyn KeyGenerator>,
    resolver: StatusOverrideResolver,
    presenter: Arc<dyn Presenter>,
    desktop: DesktopNotificationBridge,
    driver: SubscriptionDriver,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// NotificationCenter はアプリ全体の通知フィード
///
/// Cheap to clone; all clones share one feed.
///
/// # 使用例
/// ```ignore
/// let center = NotificationCenterBuilder::new(EngineConfig::default())
///     .event_source(Arc::new(InMemoryEventSource::new()))
///     .build()?;
/// let key = center.upsert_notification(NotificationPatch::new().message("Clone").open(true));
/// ```
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

/// Handle held by subscriber tasks. Does not keep the center alive.
#[derive(Clone)]
pub struct WeakCenter(Weak<Inner>);

impl WeakCenter {
    pub fn upgrade(&self) -> Option<NotificationCenter> {
        self.0.upgrade().map(|inner| NotificationCenter { inner })
    }
}

impl NotificationCenter {
    pub(crate) fn new(
        store: Box<dyn NotificationStore>,
        keys: Arc<dyn KeyGenerator>,
        presenter: Arc<dyn Presenter>,
        desktop: DesktopNotificationBridge,
        driver: SubscriptionDriver,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CenterState {
                    store,
                    active: HashSet::new(),
                }),
                keys,
                resolver: StatusOverrideResolver::new(),
                presenter,
                desktop,
                driver,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakCenter {
        WeakCenter(Arc::downgrade(&self.inner))
    }

    /// Create or update a notification. Returns its key (generated when the
    /// patch has none).
    pub fn upsert_notification(&self, patch: NotificationPatch) -> NotificationKey {
        self.upsert_notification_with(patch, UpsertOptions::default())
    }

    pub fn upsert_notification_with(
        &self,
        mut patch: NotificationPatch,
        options: UpsertOptions,
    ) -> NotificationKey {
        let key = match patch.key.take() {
            Some(key) => key,
            None => self.inner.keys.generate_key(),
        };
        self.apply(key.clone(), patch, options, false);
        key
    }

    /// Like `upsert_notification_with`, but drops the patch when the key is
    /// no longer in the feed (cleared or evicted). Returns whether it was
    /// applied. Used by task subscribers for late updates.
    pub(crate) fn update_existing(&self, patch: NotificationPatch, options: UpsertOptions) -> bool {
        let Some(key) = patch.key.clone() else {
            return false;
        };
        self.apply(key, NotificationPatch { key: None, ..patch }, options, true)
    }

    fn apply(
        &self,
        key: NotificationKey,
        patch: NotificationPatch,
        options: UpsertOptions,
        existing_only: bool,
    ) -> bool {
        let mut open = patch.open;

        let (record, reflection, pending) = {
            let mut state = self.inner.lock();
            if existing_only && state.store.get(&key).is_none() {
                debug!(key = %key, "dropping update for a notification no longer in the feed");
                return false;
            }
            let mut record = state.store.upsert(key.clone(), patch);

            if !options.skip_override_by_status {
                let overrides = self.inner.resolver.resolve(&record, None);
                if !overrides.is_empty() {
                    if overrides.open.is_some() {
                        open = overrides.open;
                    }
                    record = state.store.upsert(key.clone(), overrides);
                }
            }

            let CenterState { store, active } = &mut *state;
            active.retain(|k| store.get(k).is_some());

            let reflection = Reflection::decide(open, active.contains(&key));
            match reflection {
                Reflection::Show if open == Some(true) => {
                    active.insert(key.clone());
                }
                Reflection::Close => {
                    active.remove(&key);
                }
                _ => {}
            }

            let pending: Vec<Notification> = store
                .list()
                .into_iter()
                .filter(Notification::is_pending)
                .collect();
            (record, reflection, pending)
        };

        match reflection {
            Reflection::Show => {
                self.inner
                    .desktop
                    .maybe_notify(&record, options.skip_desktop_notification);
                self.inner.presenter.show(&record, self.dismiss_handle(&key));
            }
            Reflection::Close => self.inner.presenter.destroy(&key),
            Reflection::Silent => trace!(key = %key, "stored without showing"),
        }

        self.inner.driver.reconcile(&self.downgrade(), &pending);
        true
    }

    /// Close the shown instance and mark the notification closed. The record
    /// stays in the feed; a running task keeps updating it.
    pub fn destroy_notification(&self, key: &NotificationKey) {
        self.mark_closed(key);
        self.inner.presenter.destroy(key);
    }

    /// Empty the feed and close everything shown.
    pub fn clear_all_notifications(&self) {
        {
            let mut state = self.inner.lock();
            state.store.clear();
            state.active.clear();
        }
        self.inner.presenter.destroy_all();
    }

    /// Snapshot of the feed in insertion order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().store.list()
    }

    pub fn get(&self, key: &NotificationKey) -> Option<Notification> {
        self.inner.lock().store.get(key).cloned()
    }

    pub fn is_active(&self, key: &NotificationKey) -> bool {
        self.inner.lock().active.contains(key)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_notifications(&self.notifications())
    }

    pub fn subscriptions(&self) -> &SubscriptionDriver {
        &self.inner.driver
    }

    fn mark_closed(&self, key: &NotificationKey) {
        let mut state = self.inner.lock();
        state.store.set_open(key, false);
        state.active.remove(key);
    }

    fn dismiss_handle(&self, key: &NotificationKey) -> DismissHandle {
        let center = self.downgrade();
        let key = key.clone();
        DismissHandle::new(move || {
            if let Some(center) = center.upgrade() {
                trace!(key = %key, "dismissed by user");
                center.mark_closed(&key);
            }
        })
    }
}
