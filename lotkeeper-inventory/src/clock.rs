use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for expiry evaluation and timestamps.
///
/// Injected rather than read ambiently so policy decisions are
/// reproducible in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Pin to midnight UTC of the given date
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
