//! Expiration notifier.
//!
//! Asks the store which subscriptions end within the horizon and raises a
//! warning when there are any. Each `check` decides on its own: an
//! unchanged expiring set raises the warning again.

use std::sync::{PoisonError, RwLock};

use crate::status::StatusBoard;
use crate::store::SubscriptionStore;
use crate::subscription::{ExpiryHorizon, Subscription, UserContext};

/// Subscriptions found inside the horizon by the last successful check.
pub type NotificationSet = Vec<Subscription>;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Nothing expires soon; the notification set was cleared.
    Clear,
    /// This many subscriptions expire soon; a warning was raised.
    Expiring(usize),
    /// The store call failed; nothing changed.
    Unavailable,
}

/// Tracks the expiring-soon set and raises the warning.
#[derive(Debug, Default)]
pub struct ExpirationNotifier {
    horizon: ExpiryHorizon,
    notifications: RwLock<NotificationSet>,
}

impl ExpirationNotifier {
    /// Creates a notifier for the given horizon.
    #[must_use]
    pub fn new(horizon: ExpiryHorizon) -> Self {
        Self {
            horizon,
            notifications: RwLock::default(),
        }
    }

    /// The horizon in use.
    #[must_use]
    pub const fn horizon(&self) -> ExpiryHorizon {
        self.horizon
    }

    /// The current notification set.
    #[must_use]
    pub fn current(&self) -> NotificationSet {
        self.notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Warning text for `count` expiring subscriptions.
    #[must_use]
    pub fn warning_text(&self, count: usize) -> String {
        format!(
            "You have {count} subscription(s) expiring in {} days!",
            self.horizon.in_days()
        )
    }

    /// Fetches the expiring set and raises a warning if it is non-empty.
    ///
    /// Store failures are logged and swallowed; they never reach the status
    /// board and the previous notification set is kept.
    pub async fn check<S: SubscriptionStore>(
        &self,
        store: &S,
        user: &UserContext,
        status: &StatusBoard,
    ) -> CheckOutcome {
        let expiring = match store.list_expiring(user, self.horizon).await {
            Ok(expiring) => expiring,
            Err(e) => {
                tracing::warn!("Failed to fetch notifications: {e}");
                return CheckOutcome::Unavailable;
            }
        };

        let count = expiring.len();
        if count > 0 {
            status.warning(self.warning_text(count));
            tracing::info!("{count} subscription(s) expiring soon");
        }
        *self
            .notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner) = expiring;

        if count > 0 {
            CheckOutcome::Expiring(count)
        } else {
            CheckOutcome::Clear
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::status::Severity;
    use crate::store::MemoryStore;
    use crate::time::MockClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn setup() -> (MemoryStore, StatusBoard, UserContext) {
        let clock = Arc::new(MockClock::on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
        let store = MemoryStore::with_clock(clock.clone());
        let status = StatusBoard::new(clock, crate::status::DEFAULT_TIMEOUT);
        (store, status, UserContext::new("u"))
    }

    #[tokio::test]
    async fn test_warning_reports_count() {
        let (store, status, user) = setup();
        store.seed(&user, "Spotify", NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
        let notifier = ExpirationNotifier::default();

        let outcome = notifier.check(&store, &user, &status).await;

        assert_eq!(outcome, CheckOutcome::Expiring(1));
        let message = status.current().unwrap();
        assert_eq!(message.severity, Severity::Warning);
        assert!(message.text.contains('1'));
        assert_eq!(notifier.current().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_checks_warn_each_time() {
        let (store, status, user) = setup();
        store.seed(&user, "Spotify", NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
        let notifier = ExpirationNotifier::default();

        notifier.check(&store, &user, &status).await;
        notifier.check(&store, &user, &status).await;

        assert_eq!(status.raised_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_set_clears_without_message() {
        let (store, status, user) = setup();
        let id = store.seed(&user, "HBO", NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
        let notifier = ExpirationNotifier::default();
        notifier.check(&store, &user, &status).await;
        assert_eq!(notifier.current().len(), 1);

        store.delete(&id).await.unwrap();
        status.dismiss();
        let outcome = notifier.check(&store, &user, &status).await;

        assert_eq!(outcome, CheckOutcome::Clear);
        assert!(notifier.current().is_empty());
        assert!(status.current().is_none());
        assert_eq!(status.raised_count(), 1);
    }

    #[test]
    fn test_warning_text_uses_horizon() {
        let notifier = ExpirationNotifier::new(ExpiryHorizon::days(7));
        assert_eq!(
            notifier.warning_text(2),
            "You have 2 subscription(s) expiring in 7 days!"
        );
    }
}
