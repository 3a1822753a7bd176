use crate::config::JournalSettings;
use crate::dates::DATE_KEY_FORMAT;
use crate::errors::{JournalError, Result};
use crate::models::{AnalyticsReport, MAX_RATING, MIN_RATING, MoodEntry, RatingCount, TrendPoint};
use crate::repository::DateRange;
use crate::stats::{dated_entries, summarize};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_RANGE: &str = "30d";

/// Absolute interval a range token resolves to; both ends inclusive.
#[derive(Debug, Clone)]
pub struct TimeWindow<Tz: TimeZone> {
    pub token: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> TimeWindow<Tz> {
    pub fn resolve(token: &str, now: &DateTime<Tz>, settings: &JournalSettings) -> Result<Self> {
        let token = token.trim();
        let days = settings
            .ranges
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(token))
            .map(|(_, days)| *days)
            .ok_or_else(|| JournalError::InvalidRange(token.to_string()))?;

        Ok(Self {
            token: token.to_ascii_lowercase(),
            start: now.clone() - Duration::days(i64::from(days)),
            end: now.clone(),
        })
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// Entries whose effective moment lies inside the window. Entries without
    /// a parseable date cannot be placed and are dropped.
    pub fn filter(&self, entries: &[MoodEntry]) -> Vec<MoodEntry> {
        let tz = self.end.timezone();
        entries
            .iter()
            .filter(|entry| match entry.effective_instant(&tz) {
                Some(instant) => self.contains(&instant),
                None => {
                    warn!(entry = %entry.id, "dropping mood entry with unparseable date");
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// The same interval as a repository filter.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start.fixed_offset(),
            end: self.end.fixed_offset(),
        }
    }
}

/// Narrows `entries` to the `token` window and derives every analytics view
/// from that one snapshot.
pub fn build_report<Tz: TimeZone>(
    entries: &[MoodEntry],
    token: &str,
    now: &DateTime<Tz>,
    settings: &JournalSettings,
) -> Result<AnalyticsReport> {
    let window = TimeWindow::resolve(token, now, settings)?;
    let windowed = window.filter(entries);
    let dated = dated_entries(&windowed, &now.timezone());
    debug!(
        range = %window.token,
        total = entries.len(),
        kept = dated.len(),
        "built analytics window"
    );

    Ok(AnalyticsReport {
        range: window.token.clone(),
        start: window.start.fixed_offset().to_rfc3339(),
        end: window.end.fixed_offset().to_rfc3339(),
        summary: summarize(&dated, now, settings),
        distribution: distribution(&dated),
        trend: trend(&dated),
    })
}

/// Entry count for every rating, zero-filled.
fn distribution(dated: &[(NaiveDate, &MoodEntry)]) -> Vec<RatingCount> {
    (MIN_RATING..=MAX_RATING)
        .map(|rating| RatingCount {
            rating,
            count: dated.iter().filter(|(_, entry)| entry.rating == rating).count(),
        })
        .collect()
}

fn trend(dated: &[(NaiveDate, &MoodEntry)]) -> Vec<TrendPoint> {
    let mut per_day: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for (day, entry) in dated {
        let slot = per_day.entry(*day).or_default();
        slot.0 += entry.rating;
        slot.1 += 1;
    }

    per_day
        .into_iter()
        .map(|(day, (sum, entries))| TrendPoint {
            date: day.format(DATE_KEY_FORMAT).to_string(),
            average_mood: sum as f64 / entries as f64,
            entries,
        })
        .collect()
}
