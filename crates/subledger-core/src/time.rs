//! Time abstraction for testability.
//!
//! Expiry checks work on calendar dates and status messages dismiss
//! themselves after a fixed duration. Both read the time through the
//! `Clock` trait so tests can pin "today" and advance time by hand.
//!
//! # Example
//!
//! ```
//! use subledger_core::time::{Clock, MockClock};
//! use std::time::Duration;
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//!
//! clock.advance(Duration::from_secs(5));
//! assert!(clock.has_elapsed(start, Duration::from_secs(5)));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};

/// Abstraction over time for testability.
///
/// In production, use [`SystemClock`]. In tests, use [`MockClock`] to
/// control time deterministically.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Returns the elapsed time since the given instant.
    ///
    /// Instants in the future count as zero elapsed time.
    fn elapsed(&self, since: DateTime<Utc>) -> Duration {
        (self.now() - since).to_std().unwrap_or(Duration::ZERO)
    }

    /// Checks if a duration has elapsed since the given instant.
    fn has_elapsed(&self, since: DateTime<Utc>, duration: Duration) -> bool {
        self.elapsed(since) >= duration
    }
}

/// System clock that uses real time.
///
/// `today()` is the local calendar date, which is what users mean when they
/// type a renewal date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A mock clock for testing time-dependent code.
///
/// The clock starts at a base instant and can be advanced manually.
/// `today()` is the UTC date of the current mock instant.
#[derive(Debug)]
pub struct MockClock {
    /// Base instant (when the clock was created).
    base: DateTime<Utc>,
    /// Offset from base in milliseconds.
    offset_millis: AtomicI64,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Creates a new mock clock starting at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a mock clock starting at the given instant.
    #[must_use]
    pub const fn at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            offset_millis: AtomicI64::new(0),
        }
    }

    /// Creates a mock clock starting at noon (UTC) on the given date.
    ///
    /// Noon keeps small advances from rolling the date over.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .map_or_else(Utc::now, |t| t.and_utc());
        Self::at(noon)
    }

    /// Creates a mock clock that can be shared across threads.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances the clock by the given duration.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&self, duration: Duration) {
        let millis = duration.as_millis() as i64;
        self.offset_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Advances the clock by whole days.
    pub fn advance_days(&self, days: u32) {
        self.advance(Duration::from_secs(u64::from(days) * 86_400));
    }

    /// Resets the clock to the base time.
    pub fn reset(&self) {
        self.offset_millis.store(0, Ordering::SeqCst);
    }

    /// Returns the current offset from the base time.
    #[must_use]
    pub fn offset(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.offset_millis.load(Ordering::SeqCst))
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + self.offset()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }

    fn today(&self) -> NaiveDate {
        self.as_ref().today()
    }
}

/// A shared clock for dynamic dispatch.
pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let before = Utc::now();
        let from_clock = clock.now();
        let after = Utc::now();

        assert!(from_clock >= before);
        assert!(from_clock <= after);
    }

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.elapsed(start), Duration::from_secs(10));

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.elapsed(start), Duration::from_secs(15));
    }

    #[test]
    fn test_mock_clock_on_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let clock = MockClock::on(date);
        assert_eq!(clock.today(), date);

        clock.advance_days(3);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_mock_clock_reset() {
        let clock = MockClock::new();
        clock.advance(Duration::from_secs(30));
        assert_eq!(clock.offset(), TimeDelta::seconds(30));

        clock.reset();
        assert_eq!(clock.offset(), TimeDelta::zero());
    }

    #[test]
    fn test_has_elapsed() {
        let clock = MockClock::new();
        let start = clock.now();

        assert!(!clock.has_elapsed(start, Duration::from_secs(5)));

        clock.advance(Duration::from_secs(5));
        assert!(clock.has_elapsed(start, Duration::from_secs(5)));
        assert!(!clock.has_elapsed(start, Duration::from_secs(6)));
    }

    #[test]
    fn test_future_instant_counts_as_zero() {
        let clock = MockClock::new();
        let later = clock.now() + TimeDelta::seconds(60);
        assert_eq!(clock.elapsed(later), Duration::ZERO);
    }

    #[test]
    fn test_shared_clock_through_arc() {
        let clock = MockClock::shared();
        let shared: SharedClock = clock.clone();

        let start = shared.now();
        clock.advance(Duration::from_secs(10));
        assert_eq!(shared.elapsed(start), Duration::from_secs(10));
    }
}
