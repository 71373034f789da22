// Multi-unit duration arithmetic for cache lifetimes

use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
/// A month counts as exactly 30 days.
pub const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;
/// A year counts as exactly 365 days.
pub const SECONDS_PER_YEAR: i64 = 365 * SECONDS_PER_DAY;

/// A duration expressed in calendar-ish units, reduced to seconds on demand.
///
/// Freshness lifetimes in cache headers are plain second counts, but callers
/// usually think in hours or days. `CacheDuration` keeps the units separate
/// until [`as_seconds`](CacheDuration::as_seconds) flattens them with fixed
/// approximations (30-day months, 365-day years).
///
/// # Examples
///
/// ```
/// use armature_http_caching::CacheDuration;
///
/// assert_eq!(CacheDuration::hours(1).as_seconds(), 3600);
/// assert_eq!(
///     (CacheDuration::hours(1) + CacheDuration::minutes(2) + CacheDuration::seconds(2))
///         .as_seconds(),
///     3722,
/// );
/// assert_eq!(CacheDuration::from(90).as_seconds(), 90);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDuration {
    pub seconds: i64,
    pub minutes: i64,
    pub hours: i64,
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
    pub years: i64,
}

impl CacheDuration {
    /// The zero duration.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn seconds(seconds: i64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    pub fn minutes(minutes: i64) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn hours(hours: i64) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn weeks(weeks: i64) -> Self {
        Self {
            weeks,
            ..Self::default()
        }
    }

    pub fn months(months: i64) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn years(years: i64) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    /// Total seconds across all units. Signs pass through unchanged, so
    /// negative components subtract.
    pub fn as_seconds(&self) -> i64 {
        self.seconds
            + self.minutes * SECONDS_PER_MINUTE
            + self.hours * SECONDS_PER_HOUR
            + self.days * SECONDS_PER_DAY
            + self.weeks * SECONDS_PER_WEEK
            + self.months * SECONDS_PER_MONTH
            + self.years * SECONDS_PER_YEAR
    }
}

impl Add for CacheDuration {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            seconds: self.seconds + other.seconds,
            minutes: self.minutes + other.minutes,
            hours: self.hours + other.hours,
            days: self.days + other.days,
            weeks: self.weeks + other.weeks,
            months: self.months + other.months,
            years: self.years + other.years,
        }
    }
}

impl From<i64> for CacheDuration {
    fn from(seconds: i64) -> Self {
        Self::seconds(seconds)
    }
}
