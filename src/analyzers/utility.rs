use chrono::{DateTime, Utc};

/// Records returned by each analyzer after ranking.
pub const TOP_N: usize = 10;

/// Signed number of seconds from `earlier` to `later`, millisecond precision.
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

/// Sorts `items` by `key` descending and keeps the first [`TOP_N`].
///
/// The sort is stable, so equal keys keep their incoming order.
pub fn keep_top<T>(items: &mut Vec<T>, key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| key(b).total_cmp(&key(a)));
    items.truncate(TOP_N);
}
