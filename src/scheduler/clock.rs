//! Wall-clock boundary arithmetic

use chrono::{DateTime, Duration, Utc};

/// First UTC multiple of `interval_secs` strictly after `now`
pub fn next_boundary(now: DateTime<Utc>, interval_secs: u64) -> DateTime<Utc> {
    let interval = interval_secs.max(1) as i64;
    let secs = now.timestamp();
    let next = (secs.div_euclid(interval) + 1) * interval;
    DateTime::<Utc>::from_timestamp(next, 0).unwrap_or(now + Duration::seconds(interval))
}

/// Whole seconds until the next boundary, in `1..=interval_secs`
///
/// Exactly on a boundary this is the full interval, matching a countdown
/// display that reads 60 at the top of the minute.
pub fn seconds_until_boundary(now: DateTime<Utc>, interval_secs: u64) -> u64 {
    let interval = interval_secs.max(1) as i64;
    (interval - now.timestamp().rem_euclid(interval)) as u64
}

/// Number of boundaries in `(from, to]`
pub fn boundaries_between(from: DateTime<Utc>, to: DateTime<Utc>, interval_secs: u64) -> u64 {
    if to <= from {
        return 0;
    }
    let interval = interval_secs.max(1) as i64;
    let crossed = to.timestamp().div_euclid(interval) - from.timestamp().div_euclid(interval);
    crossed.max(0) as u64
}
