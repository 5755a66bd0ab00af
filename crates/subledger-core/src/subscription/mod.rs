//! Subscription domain module.
//!
//! Provides the subscription model, input validation and the registry of
//! known services.

mod model;
mod registry;
mod validation;

pub use model::{
    DATE_FORMAT, ExpiryHorizon, NewSubscription, Subscription, SubscriptionId, UserContext,
    parse_end_date,
};
pub use registry::{KnownService, ServiceRegistry};
pub use validation::{
    ValidationError, resolve_service, validate_end_date, validate_new_subscription,
};
