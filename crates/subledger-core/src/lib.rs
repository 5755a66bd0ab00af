//! # subledger-core
//!
//! Subscription lifecycle and expiration-notification engine for `SubLedger`.
//!
//! This crate provides:
//! - Subscription domain model and input validation
//! - Remote store client (`HTTP`) and an in-process store
//! - **Subscription Cache** - full-replace read replica of the remote list
//! - **Expiration Notifier** - warns about subscriptions about to lapse
//! - **Lifecycle Controller** - add/renew/delete orchestration with status messages
//! - Client configuration and the known-service registry
//!
//! ## Example
//!
//! ```ignore
//! use subledger_core::{AddForm, HttpStore, LifecycleController, UserContext};
//!
//! let store = HttpStore::new("http://localhost:5000/api")?;
//! let controller = LifecycleController::new(store, my_prompts, UserContext::new("42"));
//! controller.mount().await;
//!
//! let mut form = AddForm::known("Netflix", "2025-03-01");
//! controller.add(&mut form).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
mod error;
pub mod lifecycle;
pub mod notifier;
pub mod status;
pub mod store;
pub mod subscription;
pub mod time;

pub use cache::{RefreshTicket, SubscriptionCache};
pub use config::{ClientConfig, CoreSettings};
pub use error::{Error, Result};
pub use lifecycle::{ActionOutcome, AddForm, Interaction, LifecycleController, ScriptedInteraction};
pub use notifier::{CheckOutcome, ExpirationNotifier, NotificationSet};
pub use status::{Severity, StatusBoard, StatusMessage};
pub use store::{HttpStore, MemoryStore, StoreError, StoreResult, SubscriptionStore};
pub use subscription::{
    ExpiryHorizon, KnownService, NewSubscription, ServiceRegistry, Subscription, SubscriptionId,
    UserContext, ValidationError, parse_end_date,
};
pub use time::{Clock, MockClock, SharedClock, SystemClock};
