//! Remote store client.
//!
//! The store owns the durable copies of a user's subscriptions. Every
//! operation is a single attempt: there are no retries here, and callers
//! decide what a failure means for the user.

mod http;
mod memory;

use std::future::Future;

use chrono::NaiveDate;

pub use http::{DEFAULT_BASE_URL, HttpStore};
pub use memory::MemoryStore;

use crate::subscription::{
    ExpiryHorizon, NewSubscription, Subscription, SubscriptionId, UserContext,
};

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the payload.
    #[error("Rejected by store: {0}")]
    Validation(String),

    /// Network failure, unexpected status or unreadable response.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl StoreError {
    /// Returns true if the store rejected the input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The four subscription operations plus the expiring-soon query.
pub trait SubscriptionStore: Send + Sync {
    /// Lists the user's subscriptions in store order.
    fn list(
        &self,
        user: &UserContext,
    ) -> impl Future<Output = StoreResult<Vec<Subscription>>> + Send;

    /// Creates a subscription.
    ///
    /// Returns the stored record when the store echoes one back. `None`
    /// still means the store accepted it.
    fn create(
        &self,
        user: &UserContext,
        subscription: &NewSubscription,
    ) -> impl Future<Output = StoreResult<Option<Subscription>>> + Send;

    /// Moves a subscription's end date. Returns the record like `create`.
    fn renew(
        &self,
        id: &SubscriptionId,
        end_date: NaiveDate,
    ) -> impl Future<Output = StoreResult<Option<Subscription>>> + Send;

    /// Deletes a subscription.
    fn delete(&self, id: &SubscriptionId) -> impl Future<Output = StoreResult<()>> + Send;

    /// Lists subscriptions whose end date falls inside the horizon.
    fn list_expiring(
        &self,
        user: &UserContext,
        horizon: ExpiryHorizon,
    ) -> impl Future<Output = StoreResult<Vec<Subscription>>> + Send;
}
