//! Presenter port - the UI's live notification stack.

use std::fmt;
use std::sync::Arc;

use crate::domain::{Notification, NotificationKey};

/// Presenter renders notifications that are currently active.
///
/// `show` may be called many times for the same key; each call replaces what
/// is shown for that key. Implementations must not call back into the
/// notification center synchronously from `show` except through the
/// `DismissHandle`.
pub trait Presenter: Send + Sync {
    fn show(&self, notification: &Notification, dismiss: DismissHandle);

    /// Remove the shown instance for `key`. No-op if nothing is shown.
    fn destroy(&self, key: &NotificationKey);

    fn destroy_all(&self);
}

/// Callback for a user-driven close.
#[derive(Clone)]
pub struct DismissHandle {
    on_dismiss: Arc<dyn Fn() + Send + Sync>,
}

impl DismissHandle {
    pub fn new(on_dismiss: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            on_dismiss: Arc::new(on_dismiss),
        }
    }

    pub fn dismiss(&self) {
        (self.on_dismiss)()
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissHandle")
    }
}
