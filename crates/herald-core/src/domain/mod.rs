//! Domain model (keys, notifications, patches, overrides, task events).

pub mod errors;
pub mod events;
pub mod ids;
pub mod notification;
pub mod overrides;
pub mod patch;
pub mod payload;
pub mod promise;
pub mod status;

pub use self::errors::{ConfigError, DesktopError, TransportError};
pub use self::events::{ProgressPayload, TaskEvent, TaskEventKind};
pub use self::ids::{NotificationKey, TaskId, Topic, topics};
pub use self::notification::{BackgroundTask, Content, Notification};
pub use self::overrides::{OnChange, OverrideFn, OverrideSpec};
pub use self::patch::{BackgroundTaskPatch, NotificationPatch};
pub use self::payload::Payload;
pub use self::promise::{Settlement, TaskPromise};
pub use self::status::TaskStatus;
