use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Source of "now" for attempt timestamps.
///
/// Services hold a `Clock` instead of calling `Utc::now()` directly so tests can
/// pin the time an attempt is recorded at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Clock backed by the system time.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// Clock pinned at `at`.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Calendar date of `now()` in UTC, the precision the progress screen shows.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Moves a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns the deterministic test timestamp.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` pinned at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_and_system_does_not_panic() {
        let mut clock = fixed_clock();
        clock.advance(Duration::days(1));
        assert_eq!(clock.now(), fixed_now() + Duration::days(1));

        let mut system = Clock::system();
        system.advance(Duration::days(1));
        assert_eq!(system, Clock::System);
    }

    #[test]
    fn today_uses_utc_date() {
        assert_eq!(
            fixed_clock().today(),
            NaiveDate::from_ymd_opt(2023, 11, 14).unwrap()
        );
    }
}
