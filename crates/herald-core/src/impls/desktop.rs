//! Desktop surface and navigator for environments without a native shell.

use crate::domain::DesktopError;
use crate::ports::{ClickHandler, DesktopNotification, DesktopSurface, Navigator};

/// Surface that reports "unsupported" for every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDesktop;

impl DesktopSurface for UnsupportedDesktop {
    fn show(&self, _notification: DesktopNotification, _on_click: ClickHandler) -> Result<(), DesktopError> {
        Err(DesktopError::Unsupported)
    }
}

/// Navigator that logs instead of routing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn focus(&self) {
        tracing::debug!("focus requested");
    }

    fn navigate(&self, to: &str) {
        tracing::debug!(to = %to, "navigation requested");
    }
}
