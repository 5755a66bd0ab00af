//! Desktop notifications for expiring-soon warnings.

use std::cell::Cell;

use notify_rust::Notification;
use subledger_core::{Severity, StatusMessage};

/// Mirrors newly raised warnings to the desktop.
#[derive(Debug)]
pub struct DesktopAlerts {
    enabled: bool,
    last_seen: Cell<u64>,
}

impl DesktopAlerts {
    /// Creates the notifier. When disabled nothing is ever shown.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_seen: Cell::new(0),
        }
    }

    /// Shows `message` if it is a warning not shown before.
    pub fn observe(&self, message: Option<&StatusMessage>) {
        let Some(message) = message else {
            return;
        };
        if message.id <= self.last_seen.get() {
            return;
        }
        self.last_seen.set(message.id);

        if !self.enabled || message.severity != Severity::Warning {
            return;
        }

        if let Err(e) = Notification::new()
            .summary("SubLedger")
            .body(&message.text)
            .show()
        {
            tracing::warn!("Failed to show desktop notification: {e}");
        }
    }
}
