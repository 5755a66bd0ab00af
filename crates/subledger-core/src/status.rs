//! Transient status messages.
//!
//! Every action outcome raises one message. Only the latest message can be
//! visible; raising a new one replaces the old one immediately. A message
//! hides itself once its timeout has elapsed or when dismissed, and never
//! becomes visible again.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::time::{SharedClock, SystemClock};

/// How long a message stays up unless dismissed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The action completed.
    Success,
    /// Something needs the user's attention.
    Warning,
    /// The action failed.
    Error,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Increases with every raised message.
    pub id: u64,
    /// Text to display.
    pub text: String,
    /// Severity.
    pub severity: Severity,
    /// When the message was raised.
    pub raised_at: DateTime<Utc>,
    visible: bool,
}

impl StatusMessage {
    /// Whether the message is still on screen.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Default)]
struct BoardState {
    latest: Option<StatusMessage>,
    raised: u64,
}

/// Holder of the single current status message.
pub struct StatusBoard {
    state: Mutex<BoardState>,
    clock: SharedClock,
    timeout: Duration,
}

impl std::fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBoard")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_TIMEOUT)
    }
}

impl StatusBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new(clock: SharedClock, timeout: Duration) -> Self {
        Self {
            state: Mutex::new(BoardState::default()),
            clock,
            timeout,
        }
    }

    /// Auto-dismiss timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Raises a message, superseding whatever was shown. Returns its id.
    pub fn raise(&self, severity: Severity, text: impl Into<String>) -> u64 {
        let text = text.into();
        let mut state = self.lock();
        state.raised += 1;
        let id = state.raised;
        tracing::debug!("Status #{id} [{severity}]: {text}");
        state.latest = Some(StatusMessage {
            id,
            text,
            severity,
            raised_at: self.clock.now(),
            visible: true,
        });
        id
    }

    /// Raises a success message.
    pub fn success(&self, text: impl Into<String>) -> u64 {
        self.raise(Severity::Success, text)
    }

    /// Raises a warning message.
    pub fn warning(&self, text: impl Into<String>) -> u64 {
        self.raise(Severity::Warning, text)
    }

    /// Raises an error message.
    pub fn error(&self, text: impl Into<String>) -> u64 {
        self.raise(Severity::Error, text)
    }

    /// Hides the current message. Returns false if nothing was visible.
    pub fn dismiss(&self) -> bool {
        let mut state = self.lock();
        self.expire(&mut state);
        match state.latest.as_mut() {
            Some(message) if message.visible => {
                message.visible = false;
                true
            }
            _ => false,
        }
    }

    /// The visible message, if any.
    #[must_use]
    pub fn current(&self) -> Option<StatusMessage> {
        let mut state = self.lock();
        self.expire(&mut state);
        state.latest.clone().filter(|m| m.visible)
    }

    /// The most recently raised message, visible or not.
    #[must_use]
    pub fn latest(&self) -> Option<StatusMessage> {
        let mut state = self.lock();
        self.expire(&mut state);
        state.latest.clone()
    }

    /// Number of messages raised so far.
    #[must_use]
    pub fn raised_count(&self) -> u64 {
        self.lock().raised
    }

    fn expire(&self, state: &mut BoardState) {
        if let Some(message) = state.latest.as_mut() {
            if message.visible && self.clock.has_elapsed(message.raised_at, self.timeout) {
                message.visible = false;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::time::MockClock;

    fn board() -> (Arc<MockClock>, StatusBoard) {
        let clock = MockClock::shared();
        let board = StatusBoard::new(clock.clone(), DEFAULT_TIMEOUT);
        (clock, board)
    }

    #[test]
    fn test_new_message_supersedes() {
        let (_, board) = board();
        board.success("saved");
        board.error("failed");

        let current = board.current().unwrap();
        assert_eq!(current.text, "failed");
        assert_eq!(current.severity, Severity::Error);
        assert_eq!(board.raised_count(), 2);
    }

    #[test]
    fn test_auto_dismiss_after_timeout() {
        let (clock, board) = board();
        board.warning("expiring");

        clock.advance(Duration::from_millis(4_999));
        assert!(board.current().is_some());

        clock.advance(Duration::from_millis(1));
        assert!(board.current().is_none());
        assert!(!board.latest().unwrap().is_visible());
    }

    #[test]
    fn test_dismiss_hides_once() {
        let (_, board) = board();
        board.success("done");

        assert!(board.dismiss());
        assert!(!board.dismiss());
        assert!(board.current().is_none());
    }

    #[test]
    fn test_dismissed_message_never_reopens() {
        let (clock, board) = board();
        board.success("done");
        clock.advance(Duration::from_secs(6));
        assert!(!board.dismiss());
        assert!(board.current().is_none());
    }

    #[test]
    fn test_superseding_restarts_timer() {
        let (clock, board) = board();
        board.success("first");
        clock.advance(Duration::from_secs(4));
        board.error("second");
        clock.advance(Duration::from_secs(4));

        assert_eq!(board.current().unwrap().text, "second");
    }
}
