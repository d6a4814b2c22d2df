use chrono::{DateTime, NaiveDate, Utc};

/// Unicommerce timestamps are milliseconds since the Unix epoch.
pub fn unicommerce_datetime(epoch_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(epoch_millis)
}

/// The UTC calendar date of a Unicommerce timestamp.
pub fn unicommerce_date(epoch_millis: i64) -> Option<NaiveDate> {
    unicommerce_datetime(epoch_millis).map(|dt| dt.date_naive())
}

/// The number of whole minutes between `since` and `now`, rounded up so that the boundary order is included.
/// Unicommerce only accepts positive windows, so the result is at least one minute.
pub fn minutes_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - since).num_seconds().max(0);
    ((seconds + 59) / 60).max(1)
}
