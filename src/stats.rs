use crate::config::JournalSettings;
use crate::dates::{DATE_KEY_FORMAT, week_range};
use crate::models::{MoodEntry, StatsSummary, TagCount};
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Entries paired with their local effective day. Records with an
/// out-of-range rating or unparseable date are logged and left out.
pub(crate) fn dated_entries<'a, Tz: TimeZone>(
    entries: &'a [MoodEntry],
    tz: &Tz,
) -> Vec<(NaiveDate, &'a MoodEntry)> {
    entries
        .iter()
        .filter_map(|entry| match entry.checked_day(tz) {
            Ok(day) => Some((day, entry)),
            Err(err) => {
                warn!(entry = %entry.id, "skipping mood entry: {err}");
                None
            }
        })
        .collect()
}

pub fn compute_stats<Tz: TimeZone>(
    entries: &[MoodEntry],
    now: &DateTime<Tz>,
    settings: &JournalSettings,
) -> StatsSummary {
    let dated = dated_entries(entries, &now.timezone());
    summarize(&dated, now, settings)
}

pub(crate) fn summarize<Tz: TimeZone>(
    dated: &[(NaiveDate, &MoodEntry)],
    now: &DateTime<Tz>,
    settings: &JournalSettings,
) -> StatsSummary {
    if dated.is_empty() {
        return StatsSummary::empty(settings.weekly_goal);
    }

    let total_entries = dated.len();
    let rating_sum: i64 = dated.iter().map(|(_, entry)| entry.rating).sum();

    let (week_first, week_last) = week_range(now, settings.week_start);
    let completed_this_week = dated
        .iter()
        .filter(|(day, _)| (week_first..=week_last).contains(day))
        .count();

    let days: HashSet<NaiveDate> = dated.iter().map(|(day, _)| *day).collect();
    let (best_day, worst_day) = extremes(dated);

    StatsSummary {
        total_entries,
        average_mood: rating_sum as f64 / total_entries as f64,
        streak_days: streak_days(&days, now.date_naive(), settings.streak_cap_days),
        weekly_goal: settings.weekly_goal,
        completed_this_week,
        best_day,
        worst_day,
        top_tags: top_tags(dated.iter().map(|(_, entry)| *entry), settings.top_tag_limit),
    }
}

/// Consecutive days with at least one entry, walking back from `today`.
/// An empty `today` is skipped rather than ending the walk; any earlier gap
/// ends it.
pub fn streak_days(days: &HashSet<NaiveDate>, today: NaiveDate, cap: u32) -> u32 {
    let mut streak = 0;
    for offset in 0..cap {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Days of the highest and lowest rated entries; the first one seen wins ties.
fn extremes(dated: &[(NaiveDate, &MoodEntry)]) -> (Option<String>, Option<String>) {
    let mut best: Option<(NaiveDate, i64)> = None;
    let mut worst: Option<(NaiveDate, i64)> = None;

    for (day, entry) in dated {
        if best.is_none_or(|(_, rating)| entry.rating > rating) {
            best = Some((*day, entry.rating));
        }
        if worst.is_none_or(|(_, rating)| entry.rating < rating) {
            worst = Some((*day, entry.rating));
        }
    }

    let key = |slot: Option<(NaiveDate, i64)>| {
        slot.map(|(day, _)| day.format(DATE_KEY_FORMAT).to_string())
    };
    (key(best), key(worst))
}

/// Tags ranked by how many entries carry them, first-seen order on ties.
pub fn top_tags<'a>(
    entries: impl IntoIterator<Item = &'a MoodEntry>,
    limit: usize,
) -> Vec<TagCount> {
    let mut ranked: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for entry in entries {
        let mut seen = HashSet::new();
        for tag in &entry.tags {
            if !seen.insert(tag.id.as_str()) {
                continue;
            }
            match positions.get(tag.id.as_str()) {
                Some(&index) => ranked[index].count += 1,
                None => {
                    positions.insert(tag.id.as_str(), ranked.len());
                    ranked.push(TagCount {
                        id: tag.id.clone(),
                        name: tag.name.clone(),
                        icon: tag.icon_key(),
                        count: 1,
                    });
                }
            }
        }
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
