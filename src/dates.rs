//! Date math for day bucketing.
//!
//! Every function is generic over the time zone carried by its arguments, so
//! "local" means the zone of `now`: `chrono::Local` in the service and a fixed
//! offset in tests. String entry points never fail: unparseable input yields an
//! empty string, `false`, or `0`.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Weekday,
};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
pub const TIME_KEY_FORMAT: &str = "%H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a timestamp as the API hands it out and moves it into `tz`.
///
/// Accepts RFC 3339 (`Z` or explicit offset), offset-less date-times (read as
/// wall-clock time in `tz`) and bare `YYYY-MM-DD` dates (local midnight).
pub fn parse_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(tz));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    let day = NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT).ok()?;
    local_midnight(tz, day)
}

pub fn to_local_date_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.date_naive().format(DATE_KEY_FORMAT).to_string()
}

pub fn to_local_time_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.time().format(TIME_KEY_FORMAT).to_string()
}

/// `YYYY-MM-DD` for a raw timestamp, or `""` when it does not parse.
pub fn date_key_of<Tz: TimeZone>(raw: &str, tz: &Tz) -> String {
    parse_instant(raw, tz)
        .map(|instant| to_local_date_key(&instant))
        .unwrap_or_default()
}

/// `HH:MM` for a raw timestamp, or `""` when it does not parse.
pub fn time_key_of<Tz: TimeZone>(raw: &str, tz: &Tz) -> String {
    parse_instant(raw, tz)
        .map(|instant| to_local_time_key(&instant))
        .unwrap_or_default()
}

/// First instant of `day` in `tz`. When midnight falls in a DST gap the first
/// wall-clock hour that exists is used instead.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
}

/// Midnight of `day` and midnight of the following day in `tz`. The span is
/// not always 24 hours: DST transitions make it 23 or 25.
pub fn local_day_bounds<Tz: TimeZone>(
    tz: &Tz,
    day: NaiveDate,
) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    Some((local_midnight(tz, day)?, local_midnight(tz, day.succ_opt()?)?))
}

pub fn start_of_local_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    local_midnight(&instant.timezone(), instant.date_naive()).unwrap_or_else(|| instant.clone())
}

/// Strictly after `now`; equal is not future.
pub fn is_in_future<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
    instant > now
}

pub fn is_raw_in_future<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> bool {
    parse_instant(raw, &now.timezone()).is_some_and(|instant| is_in_future(&instant, now))
}

/// Signed whole calendar days from `a` to `b`, positive when `b` is later.
pub fn days_between<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> i64 {
    (b.date_naive() - a.date_naive()).num_days()
}

pub fn days_between_raw<Tz: TimeZone>(a: &str, b: &str, tz: &Tz) -> i64 {
    match (parse_instant(a, tz), parse_instant(b, tz)) {
        (Some(a), Some(b)) => days_between(&a, &b),
        _ => 0,
    }
}

/// Days from the last `week_start` on or before `day` up to `day`, in `0..7`.
pub fn days_since_week_start(day: NaiveDate, week_start: Weekday) -> u32 {
    (day.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// Last day on or before `day` that falls on `week_start`, or `None` when
/// that day is before the first representable date.
pub fn week_start_of(day: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(u64::from(days_since_week_start(day, week_start))))
}

/// Inclusive first and last calendar day of the week holding `reference`,
/// clamped to the representable date range.
pub fn week_range<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    week_start: Weekday,
) -> (NaiveDate, NaiveDate) {
    let start = week_start_of(reference.date_naive(), week_start).unwrap_or(NaiveDate::MIN);
    (start, start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX))
}

/// Joins a `YYYY-MM-DD` date and an `HH:MM[:SS]` time into an ISO-8601
/// timestamp carrying `offset` explicitly (`+00:00`, never `Z`).
pub fn combine_to_iso_with_offset(date_part: &str, time_part: &str, offset: FixedOffset) -> String {
    let Ok(day) = NaiveDate::parse_from_str(date_part.trim(), DATE_KEY_FORMAT) else {
        return String::new();
    };
    let time_part = time_part.trim();
    let time = NaiveTime::parse_from_str(time_part, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time_part, TIME_KEY_FORMAT));
    let Ok(time) = time else {
        return String::new();
    };

    match offset.from_local_datetime(&day.and_time(time)).single() {
        Some(instant) => instant.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        None => String::new(),
    }
}

/// Parses `+HH:MM` / `-HH:MM` (also `+HHMM`).
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Calendar-day distance rendered for humans: `today`, `yesterday`,
/// `3 days ago`, `tomorrow`, `in 2 days`.
pub fn relative_day_label<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    match days_between(instant, now) {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        -1 => "tomorrow".to_string(),
        days if days > 1 => format!("{days} days ago"),
        days => format!("in {} days", -days),
    }
}
