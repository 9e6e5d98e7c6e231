//! Generation clock. Owns the anchor instant every timestamp is drawn against.
//!
//! The anchor plays the role of "now" for a run. It is fixed for the whole
//! run so that the same seed and anchor reproduce the same timestamps.

use crate::rng::DataRng;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serializer;

pub const ISO_UTC_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const DATE_FMT: &str = "%Y-%m-%d";

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenClock {
    pub anchor: DateTime<Utc>,
}

impl GenClock {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        // Sub-second precision never reaches the output format.
        let anchor = Utc
            .timestamp_opt(anchor.timestamp(), 0)
            .single()
            .unwrap_or(anchor);
        Self { anchor }
    }

    /// Start of the current UTC day.
    pub fn start_of_today() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor.date_naive()
    }

    /// Anchor minus `0..=max_days` whole days and `0..=86400` seconds.
    /// Two draws: days first, then seconds.
    pub fn lookback(&self, rng: &mut DataRng, max_days: i64) -> DateTime<Utc> {
        let days = rng.range_inclusive(0, max_days);
        let secs = rng.range_inclusive(0, SECONDS_PER_DAY);
        self.anchor - Duration::days(days) - Duration::seconds(secs)
    }

    /// Uniform instant inside `[anchor - days, anchor]`, one draw.
    pub fn within_window(&self, rng: &mut DataRng, days: i64) -> DateTime<Utc> {
        let span = days * SECONDS_PER_DAY;
        let offset = rng.range_inclusive(0, span);
        self.anchor - Duration::seconds(span) + Duration::seconds(offset)
    }
}

/// `from` plus `min_days..=max_days` days and `0..=86400` seconds.
pub fn forward_offset(
    rng: &mut DataRng,
    from: DateTime<Utc>,
    min_days: i64,
    max_days: i64,
) -> DateTime<Utc> {
    let days = rng.range_inclusive(min_days, max_days);
    let secs = rng.range_inclusive(0, SECONDS_PER_DAY);
    from + Duration::days(days) + Duration::seconds(secs)
}

pub fn iso_utc(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_UTC_FMT).to_string()
}

pub fn iso_date(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// `serialize_with` adapter for timestamp fields.
pub fn serialize_iso<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&iso_utc(dt))
}

/// `serialize_with` adapter for date fields.
pub fn serialize_date<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&iso_date(d))
}
