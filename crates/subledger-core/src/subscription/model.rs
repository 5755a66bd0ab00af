//! Subscription model types.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

/// Wire format of an end date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    /// Create a new subscription ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked recurring paid service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireSubscription")]
pub struct Subscription {
    /// Store-assigned identifier. Document stores send it as `_id`.
    pub id: SubscriptionId,
    /// Display name of the tracked service.
    pub service: String,
    /// Current renewal/expiry boundary.
    #[serde(rename = "endDate", serialize_with = "serialize_date")]
    pub end_date: NaiveDate,
}

/// Incoming record shape. Document stores may send `_id`, `id` or both.
#[derive(Deserialize)]
struct WireSubscription {
    #[serde(rename = "_id")]
    document_id: Option<SubscriptionId>,
    id: Option<SubscriptionId>,
    service: String,
    #[serde(rename = "endDate", deserialize_with = "deserialize_date")]
    end_date: NaiveDate,
}

impl TryFrom<WireSubscription> for Subscription {
    type Error = String;

    fn try_from(wire: WireSubscription) -> Result<Self, Self::Error> {
        let id = wire
            .document_id
            .or(wire.id)
            .ok_or_else(|| "missing field `id`".to_string())?;
        Ok(Self::new(id, wire.service, wire.end_date))
    }
}

impl Subscription {
    /// Creates a subscription record.
    #[must_use]
    pub fn new(id: SubscriptionId, service: impl Into<String>, end_date: NaiveDate) -> Self {
        Self {
            id,
            service: service.into(),
            end_date,
        }
    }

    /// Days left until the end date. Negative once lapsed.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// Returns true if the end date is already behind us.
    #[must_use]
    pub fn is_lapsed(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Validated payload for creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    /// Resolved service name (never blank).
    pub service: String,
    /// Requested end date.
    pub end_date: NaiveDate,
}

/// Explicit user scoping for every store call.
///
/// A missing user id is a degraded state, not an error: requests still go
/// out with an empty scoping value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    user_id: Option<String>,
}

impl UserContext {
    /// Context for a signed-in user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            user_id: (!user_id.trim().is_empty()).then_some(user_id),
        }
    }

    /// Context with no known user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// The user id, if known.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The value sent to the store as `userId`.
    #[must_use]
    pub fn scope(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

/// How far ahead a subscription counts as "expiring soon".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryHorizon {
    days: u32,
}

impl Default for ExpiryHorizon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ExpiryHorizon {
    /// Three days.
    pub const DEFAULT: Self = Self { days: 3 };

    /// Horizon of the given number of days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self { days }
    }

    /// Number of days covered.
    #[must_use]
    pub const fn in_days(&self) -> u32 {
        self.days
    }

    /// Last date still inside the horizon.
    #[must_use]
    ///
    /// Saturates at the last representable date.
    pub fn last_day(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_signed(TimeDelta::days(i64::from(self.days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive on both ends: `today <= end_date <= today + days`.
    #[must_use]
    pub fn contains(&self, today: NaiveDate, end_date: NaiveDate) -> bool {
        end_date >= today && end_date <= self.last_day(today)
    }

    /// Subscriptions inside the horizon, in input order.
    #[must_use]
    pub fn select<'a>(
        &self,
        today: NaiveDate,
        subscriptions: impl IntoIterator<Item = &'a Subscription>,
    ) -> Vec<Subscription> {
        subscriptions
            .into_iter()
            .filter(|s| self.contains(today, s.end_date))
            .cloned()
            .collect()
    }
}

/// Parse a user-supplied or wire end date.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the date part is kept).
#[must_use]
pub fn parse_end_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_end_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid end date: {s}")))
}
