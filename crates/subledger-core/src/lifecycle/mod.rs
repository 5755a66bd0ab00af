//! Lifecycle controller.
//!
//! Orchestrates add/renew/delete: validate, call the store, then on success
//! refresh the cache and re-run the expiration check. Every outcome raises a
//! status message except a cancelled prompt. Failures leave the cache and
//! notification set exactly as they were.
//!
//! Actions take `&self` and may overlap. Refreshes are ticketed by the
//! cache, so the newest `list` request wins regardless of completion order.

mod form;
mod interaction;

use std::sync::Arc;
use std::time::Duration;

pub use form::AddForm;
pub use interaction::{Interaction, ScriptedInteraction};

use crate::cache::SubscriptionCache;
use crate::config::CoreSettings;
use crate::notifier::{CheckOutcome, ExpirationNotifier, NotificationSet};
use crate::status::{StatusBoard, StatusMessage};
use crate::store::{StoreError, SubscriptionStore};
use crate::subscription::{
    ExpiryHorizon, ServiceRegistry, Subscription, SubscriptionId, UserContext, ValidationError,
    validate_end_date, validate_new_subscription,
};
use crate::time::{SharedClock, SystemClock};

const RENEW_PROMPT: &str = "Enter new end date (YYYY-MM-DD):";
const DELETE_PROMPT: &str = "Are you sure you want to delete this subscription?";

const ADD_FAILED: &str = "Failed to add subscription";
const RENEW_FAILED: &str = "Failed to renew subscription";
const DELETE_FAILED: &str = "Failed to delete subscription";
const REFRESH_FAILED: &str = "Failed to fetch subscriptions";

const RENEWED: &str = "Subscription renewed successfully!";
const DELETED: &str = "Subscription deleted successfully!";

/// Result of a user-initiated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The store accepted the change.
    Completed,
    /// Input was invalid; no store call was made.
    Rejected(ValidationError),
    /// The store call failed.
    Failed(StoreError),
    /// The user backed out of a prompt; nothing happened.
    Cancelled,
}

impl ActionOutcome {
    /// Returns true for `Completed`.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Drives subscription changes for one user.
pub struct LifecycleController<S, I> {
    store: S,
    interaction: I,
    user: UserContext,
    registry: ServiceRegistry,
    cache: SubscriptionCache,
    notifier: ExpirationNotifier,
    status: StatusBoard,
    clock: SharedClock,
}

impl<S, I> std::fmt::Debug for LifecycleController<S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("user", &self.user)
            .field("cache", &self.cache)
            .field("horizon", &self.notifier.horizon())
            .finish_non_exhaustive()
    }
}

impl<S: SubscriptionStore, I: Interaction> LifecycleController<S, I> {
    /// Creates a controller with default settings and the system clock.
    #[must_use]
    pub fn new(store: S, interaction: I, user: UserContext) -> Self {
        Self::from_settings(store, interaction, user, CoreSettings::default())
    }

    /// Creates a controller from explicit settings.
    #[must_use]
    pub fn from_settings(
        store: S,
        interaction: I,
        user: UserContext,
        settings: CoreSettings,
    ) -> Self {
        if user.user_id().is_none() {
            tracing::warn!("No user id available; store requests will not be scoped");
        }
        let clock: SharedClock = Arc::new(SystemClock);
        Self {
            store,
            interaction,
            user,
            registry: settings.registry,
            cache: SubscriptionCache::new(),
            notifier: ExpirationNotifier::new(settings.horizon),
            status: StatusBoard::new(Arc::clone(&clock), settings.status_timeout),
            clock,
        }
    }

    /// Uses `clock` for status message timing.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.status = StatusBoard::new(Arc::clone(&clock), self.status.timeout());
        self.clock = clock;
        self
    }

    /// Sets the expiring-soon horizon.
    #[must_use]
    pub fn with_horizon(mut self, horizon: ExpiryHorizon) -> Self {
        self.notifier = ExpirationNotifier::new(horizon);
        self
    }

    /// Sets how long status messages stay visible.
    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status = StatusBoard::new(Arc::clone(&self.clock), timeout);
        self
    }

    /// Sets the known-service registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ServiceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Initial load: refresh the cache and check for expiring subscriptions.
    pub async fn mount(&self) {
        tracing::info!("Loading subscriptions for user {:?}", self.user.scope());
        self.refresh().await;
        self.check_expiring().await;
    }

    /// Replaces the cache with the store's current list.
    ///
    /// A failed list raises an error status and keeps the cache as it was.
    pub async fn refresh(&self) -> ActionOutcome {
        let ticket = self.cache.begin_refresh();
        match self.store.list(&self.user).await {
            Ok(items) => {
                let count = items.len();
                if self.cache.apply(ticket, items) {
                    tracing::debug!("Cache refreshed with {count} subscription(s)");
                }
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to fetch subscriptions: {e}");
                self.status.error(REFRESH_FAILED);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Runs the expiration notifier.
    pub async fn check_expiring(&self) -> CheckOutcome {
        self.notifier
            .check(&self.store, &self.user, &self.status)
            .await
    }

    /// Adds a subscription from the form.
    ///
    /// The form is cleared only when the store accepted it.
    pub async fn add(&self, form: &mut AddForm) -> ActionOutcome {
        let draft = match validate_new_subscription(
            &self.registry,
            &form.selected_service,
            &form.custom_service,
            &form.end_date,
        ) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!("Add rejected ({}): {e}", e.field());
                self.status.error(e.message());
                return ActionOutcome::Rejected(e);
            }
        };

        match self.store.create(&self.user, &draft).await {
            Ok(created) => {
                match created {
                    Some(record) => {
                        tracing::info!("Added subscription {} ({})", record.id, record.service);
                    }
                    None => tracing::info!("Added subscription ({})", draft.service),
                }
                self.status.success(format!(
                    "Subscription for {} created successfully!",
                    draft.service
                ));
                form.clear();
                self.after_change().await;
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to add subscription: {e}");
                self.status.error(ADD_FAILED);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Renews a subscription with a date asked from the user.
    ///
    /// A cancelled or blank answer does nothing and raises no message.
    pub async fn renew(&self, id: &SubscriptionId) -> ActionOutcome {
        let Some(answer) = self
            .interaction
            .prompt_for_date(RENEW_PROMPT)
            .filter(|a| !a.trim().is_empty())
        else {
            tracing::debug!("Renew of {id} cancelled");
            return ActionOutcome::Cancelled;
        };

        let end_date = match validate_end_date(&answer) {
            Ok(date) => date,
            Err(e) => {
                self.status.error(e.message());
                return ActionOutcome::Rejected(e);
            }
        };

        match self.store.renew(id, end_date).await {
            Ok(_) => {
                tracing::info!("Renewed subscription {id} until {end_date}");
                self.status.success(RENEWED);
                self.after_change().await;
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to renew subscription {id}: {e}");
                self.status.error(RENEW_FAILED);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Deletes a subscription after the user confirms.
    pub async fn delete(&self, id: &SubscriptionId) -> ActionOutcome {
        if !self.interaction.confirm(DELETE_PROMPT) {
            tracing::debug!("Delete of {id} cancelled");
            return ActionOutcome::Cancelled;
        }

        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!("Deleted subscription {id}");
                self.status.success(DELETED);
                self.after_change().await;
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Failed to delete subscription {id}: {e}");
                self.status.error(DELETE_FAILED);
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Hides the current status message.
    pub fn dismiss_status(&self) -> bool {
        self.status.dismiss()
    }

    async fn after_change(&self) {
        self.refresh().await;
        self.check_expiring().await;
    }
}

impl<S, I> LifecycleController<S, I> {
    /// Snapshot of the cached subscriptions, in store order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.cache.current()
    }

    /// Looks up a cached subscription.
    #[must_use]
    pub fn find(&self, id: &SubscriptionId) -> Option<Subscription> {
        self.cache.current().into_iter().find(|s| &s.id == id)
    }

    /// Subscriptions flagged by the last successful expiration check.
    #[must_use]
    pub fn notifications(&self) -> NotificationSet {
        self.notifier.current()
    }

    /// The visible status message, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusMessage> {
        self.status.current()
    }

    /// The status board, for views that track message ids.
    #[must_use]
    pub const fn status_board(&self) -> &StatusBoard {
        &self.status
    }

    /// Known services for the picker.
    #[must_use]
    pub const fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// The user this controller acts for.
    #[must_use]
    pub const fn user(&self) -> &UserContext {
        &self.user
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The clock used for status timing.
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}
