//! Subscription cache.
//!
//! The cache is a read replica of the store's list for one user. It is
//! never patched: every refresh replaces the whole sequence, in the order
//! the store returned it.
//!
//! Refreshes can overlap when actions are started in quick succession. A
//! [`RefreshTicket`] is taken before each `list` call and [`SubscriptionCache::apply`]
//! drops a response whose ticket is older than the one already applied, so
//! a slow stale response cannot overwrite a newer one.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::subscription::Subscription;

/// Sequence number handed out before a refresh starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
struct CacheState {
    items: Vec<Subscription>,
    issued: u64,
    applied: u64,
}

/// In-memory ordered collection of the user's subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionCache {
    state: RwLock<CacheState>,
}

impl SubscriptionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current contents and stores `items` verbatim.
    ///
    /// Repeated ids keep their first occurrence.
    pub fn replace_all(&self, items: Vec<Subscription>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.items = dedup_by_id(items);
    }

    /// Snapshot of the current contents, in list order.
    #[must_use]
    pub fn current(&self) -> Vec<Subscription> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    /// Number of cached subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    /// Returns true if the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes a ticket for a refresh that is about to call the store.
    pub fn begin_refresh(&self) -> RefreshTicket {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.issued += 1;
        RefreshTicket(state.issued)
    }

    /// Replaces the contents with the response for `ticket`.
    ///
    /// Returns false, leaving the cache untouched, when a newer ticket has
    /// already been applied.
    pub fn apply(&self, ticket: RefreshTicket, items: Vec<Subscription>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 < state.applied {
            tracing::debug!(
                "Discarding stale refresh #{} (already applied #{})",
                ticket.0,
                state.applied
            );
            return false;
        }
        state.applied = ticket.0;
        state.items = dedup_by_id(items);
        true
    }
}

fn dedup_by_id(items: Vec<Subscription>) -> Vec<Subscription> {
    let mut seen = HashSet::with_capacity(items.len());
    let total = items.len();
    let unique: Vec<Subscription> = items
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            "Store returned {} duplicate subscription id(s); keeping first occurrences",
            total - unique.len()
        );
    }
    unique
}
