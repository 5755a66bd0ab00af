//! In-process store.
//!
//! Behaves like the HTTP store from the caller's point of view: ids are
//! assigned on create, records keep insertion order, and unknown ids fail
//! the same way a `404` would. The expiring set is derived from the records
//! with the injected clock.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;

use super::{StoreError, StoreResult, SubscriptionStore};
use crate::subscription::{
    ExpiryHorizon, NewSubscription, Subscription, SubscriptionId, UserContext,
};
use crate::time::{SharedClock, SystemClock};

#[derive(Debug, Clone)]
struct Record {
    owner: String,
    subscription: Subscription,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<Record>,
    next_id: u64,
}

/// Store kept entirely in memory.
pub struct MemoryStore {
    state: Mutex<State>,
    clock: SharedClock,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.lock().records.len())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that evaluates "expiring soon" with `clock`.
    #[must_use]
    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Inserts a record directly, bypassing validation. Returns its id.
    pub fn seed(&self, user: &UserContext, service: &str, end_date: NaiveDate) -> SubscriptionId {
        let mut state = self.lock();
        let id = state.allocate_id();
        state.records.push(Record {
            owner: user.scope().to_string(),
            subscription: Subscription::new(id.clone(), service, end_date),
        });
        id
    }

    /// Number of records across all users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owned_by(state: &State, user: &UserContext) -> Vec<Subscription> {
        state
            .records
            .iter()
            .filter(|r| r.owner == user.scope())
            .map(|r| r.subscription.clone())
            .collect()
    }
}

impl State {
    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId::new(self.next_id.to_string())
    }
}

fn not_found(id: &SubscriptionId) -> StoreError {
    StoreError::Transport(format!("404 Not Found: subscription {id}"))
}

impl SubscriptionStore for MemoryStore {
    async fn list(&self, user: &UserContext) -> StoreResult<Vec<Subscription>> {
        Ok(Self::owned_by(&self.lock(), user))
    }

    async fn create(
        &self,
        user: &UserContext,
        subscription: &NewSubscription,
    ) -> StoreResult<Option<Subscription>> {
        if subscription.service.trim().is_empty() {
            return Err(StoreError::Validation("service is required".into()));
        }

        let mut state = self.lock();
        let id = state.allocate_id();
        let created = Subscription::new(id, subscription.service.clone(), subscription.end_date);
        state.records.push(Record {
            owner: user.scope().to_string(),
            subscription: created.clone(),
        });
        Ok(Some(created))
    }

    async fn renew(
        &self,
        id: &SubscriptionId,
        end_date: NaiveDate,
    ) -> StoreResult<Option<Subscription>> {
        let mut state = self.lock();
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.subscription.id == id)
            .ok_or_else(|| not_found(id))?;
        record.subscription.end_date = end_date;
        Ok(Some(record.subscription.clone()))
    }

    async fn delete(&self, id: &SubscriptionId) -> StoreResult<()> {
        let mut state = self.lock();
        let position = state
            .records
            .iter()
            .position(|r| &r.subscription.id == id)
            .ok_or_else(|| not_found(id))?;
        state.records.remove(position);
        Ok(())
    }

    async fn list_expiring(
        &self,
        user: &UserContext,
        horizon: ExpiryHorizon,
    ) -> StoreResult<Vec<Subscription>> {
        let today = self.clock.today();
        let owned = Self::owned_by(&self.lock(), user);
        Ok(horizon.select(today, &owned))
    }
}
