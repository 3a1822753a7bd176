//! Month view: entries projected onto a fixed six-week grid.

use crate::dates::week_start_of;
use crate::errors::{JournalError, Result};
use crate::models::{DayBucket, MoodEntry};
use crate::stats::dated_entries;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Weekday};
use std::collections::HashMap;

/// Six full weeks, so the grid height never changes between months.
pub const GRID_CELLS: usize = 42;

/// Years a month view may be requested for; keeps date keys four digits wide.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Builds the 42-day grid for the month containing `reference`.
///
/// Entries whose date does not parse (or whose rating is out of range) are
/// left out of every bucket instead of failing the grid. A month whose grid
/// would run past the representable calendar is `InvalidInput`.
pub fn build_month_grid<Tz: TimeZone>(
    entries: &[MoodEntry],
    reference: NaiveDate,
    now: &DateTime<Tz>,
    week_start: Weekday,
) -> Result<Vec<DayBucket>> {
    let first_of_month = reference.with_day(1).unwrap_or(reference);
    let out_of_range = || {
        JournalError::invalid_input(format!(
            "month {}-{:02} is outside the supported calendar",
            first_of_month.year(),
            first_of_month.month()
        ))
    };
    let grid_start = week_start_of(first_of_month, week_start).ok_or_else(out_of_range)?;
    grid_start
        .checked_add_days(Days::new(GRID_CELLS as u64 - 1))
        .ok_or_else(out_of_range)?;
    let today = now.date_naive();

    let mut by_day: HashMap<NaiveDate, Vec<&MoodEntry>> = HashMap::new();
    for (day, entry) in dated_entries(entries, &now.timezone()) {
        by_day.entry(day).or_default().push(entry);
    }

    let grid: Vec<DayBucket> = grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let moods: Vec<MoodEntry> = by_day
                .get(&date)
                .map(|bucket| bucket.iter().map(|entry| (*entry).clone()).collect())
                .unwrap_or_default();
            DayBucket {
                date,
                is_current_month: date.year() == first_of_month.year()
                    && date.month() == first_of_month.month(),
                is_today: date == today,
                average_mood: average_rating(&moods),
                moods,
            }
        })
        .collect();
    Ok(grid)
}

/// Mean rating, `None` for an empty day.
pub fn average_rating(moods: &[MoodEntry]) -> Option<f64> {
    if moods.is_empty() {
        return None;
    }
    let sum: i64 = moods.iter().map(|mood| mood.rating).sum();
    Some(sum as f64 / moods.len() as f64)
}

pub fn month_reference(year: i32, month: u32) -> Result<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(JournalError::invalid_input(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| JournalError::invalid_input(format!("no such month {year}-{month:02}")))
}

/// Moves `reference` by `delta` months, clamping the day to the target
/// month's length.
pub fn shift_month(reference: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    }
}
