use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::game::UserMatch;

/// Length of the betting window measured from the start of the current day:
/// the rest of today, all of tomorrow, and up to 00:59:59.999 of the day after.
pub fn window_length() -> Duration {
    Duration::hours(48) + Duration::minutes(59) + Duration::seconds(59) + Duration::milliseconds(999)
}

/// Midnight of the local day containing `now`, expressed in UTC.
pub fn start_of_day(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = now
        .with_timezone(&offset)
        .date_naive()
        .and_time(NaiveTime::MIN);
    (local_midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
}

/// Half-open interval `[start, end)` of match start times open for betting.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MatchWindow {
    pub fn for_day_of(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let start = start_of_day(now, offset);
        Self {
            start,
            end: start + window_length(),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayBucketKey {
    Today,
    Tomorrow,
}

impl DayBucketKey {
    /// Everything not on today's local date lands in `Tomorrow`.
    pub fn for_start(now: DateTime<Utc>, start_date: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        if start_date.with_timezone(&offset).date_naive() == today {
            DayBucketKey::Today
        } else {
            DayBucketKey::Tomorrow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayBucketKey::Today => "Today",
            DayBucketKey::Tomorrow => "Tomorrow",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayBucket<T> {
    pub key: DayBucketKey,
    pub label: String,
    pub user_matches: Vec<T>,
}

/// Group items by day bucket. Buckets appear in the order their first item is
/// met and items keep their relative order inside a bucket.
pub fn group_by_day<T, F>(
    items: Vec<T>,
    now: DateTime<Utc>,
    offset: FixedOffset,
    start_of: F,
) -> Vec<DayBucket<T>>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut buckets: Vec<DayBucket<T>> = Vec::new();

    for item in items {
        let key = DayBucketKey::for_start(now, start_of(&item), offset);
        match buckets.iter_mut().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.user_matches.push(item),
            None => buckets.push(DayBucket {
                key,
                label: key.label().to_string(),
                user_matches: vec![item],
            }),
        }
    }

    buckets
}

pub fn group_user_matches(
    user_matches: Vec<UserMatch>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<DayBucket<UserMatch>> {
    group_by_day(user_matches, now, offset, |user_match| user_match.r#match.start_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn window_starts_at_midnight_and_spans_just_under_49_hours() {
        let window = MatchWindow::for_day_of(at(2022, 12, 1, 10, 0), utc());

        assert_eq!(window.start, at(2022, 12, 1, 0, 0));
        assert_eq!(
            window.end,
            at(2022, 12, 3, 0, 59) + Duration::seconds(59) + Duration::milliseconds(999)
        );
    }

    #[test]
    fn window_bounds_are_half_open() {
        let window = MatchWindow::for_day_of(at(2022, 12, 1, 10, 0), utc());

        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
        assert!(!window.contains(window.start - Duration::milliseconds(1)));
        assert!(window.contains(window.end - Duration::milliseconds(1)));
    }

    #[test]
    fn start_of_day_uses_local_offset() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        // 23:30 UTC on the 1st is already 00:30 on the 2nd in CET
        let start = start_of_day(at(2022, 12, 1, 23, 30), cet);
        assert_eq!(start, at(2022, 12, 1, 23, 0));

        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let start = start_of_day(at(2022, 12, 1, 3, 0), west);
        assert_eq!(start, at(2022, 11, 30, 5, 0));
    }

    #[test]
    fn bucket_key_compares_local_dates() {
        let now = at(2022, 12, 1, 10, 0);
        assert_eq!(DayBucketKey::for_start(now, at(2022, 12, 1, 18, 0), utc()), DayBucketKey::Today);
        assert_eq!(DayBucketKey::for_start(now, at(2022, 12, 2, 18, 0), utc()), DayBucketKey::Tomorrow);
        assert_eq!(DayBucketKey::for_start(now, at(2022, 12, 3, 0, 30), utc()), DayBucketKey::Tomorrow);
    }

    #[test]
    fn grouping_keeps_order_and_labels_by_content() {
        let now = at(2022, 12, 1, 10, 0);
        let starts = vec![
            at(2022, 12, 1, 16, 0),
            at(2022, 12, 1, 20, 0),
            at(2022, 12, 2, 16, 0),
            at(2022, 12, 2, 20, 0),
        ];

        let buckets = group_by_day(starts.clone(), now, utc(), |start| *start);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Today");
        assert_eq!(buckets[0].user_matches, starts[..2].to_vec());
        assert_eq!(buckets[1].label, "Tomorrow");
        assert_eq!(buckets[1].user_matches, starts[2..].to_vec());
    }

    #[test]
    fn only_tomorrow_matches_are_labelled_tomorrow() {
        let now = at(2022, 12, 1, 22, 0);
        let buckets = group_by_day(vec![at(2022, 12, 2, 13, 0)], now, utc(), |start| *start);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, DayBucketKey::Tomorrow);
        assert_eq!(buckets[0].label, "Tomorrow");
    }

    #[test]
    fn empty_input_produces_no_buckets() {
        let buckets = group_by_day(Vec::<DateTime<Utc>>::new(), at(2022, 12, 1, 10, 0), utc(), |start| *start);
        assert!(buckets.is_empty());
    }
}
