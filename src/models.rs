use crate::dates::parse_instant;
use crate::errors::JournalError;
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Icons the presentation layer knows how to draw. Unknown names fall back to
/// [`IconKey::Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Briefcase,
    Home,
    Heart,
    Users,
    Dumbbell,
    Moon,
    Sun,
    Book,
    Coffee,
    Music,
    #[default]
    Tag,
}

impl IconKey {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "briefcase" | "work" => Self::Briefcase,
            "home" | "personal" => Self::Home,
            "heart" => Self::Heart,
            "users" | "friends" => Self::Users,
            "dumbbell" | "exercise" => Self::Dumbbell,
            "moon" | "sleep" => Self::Moon,
            "sun" => Self::Sun,
            "book" | "book-open" => Self::Book,
            "coffee" => Self::Coffee,
            "music" => Self::Music,
            _ => Self::Tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    pub fn icon_key(&self) -> IconKey {
        IconKey::from_name(&self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    pub id: String,
    pub group_name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A mood record as the API returns it. Dates stay raw strings so a single
/// malformed value can be skipped instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl MoodEntry {
    /// `date` when present and non-blank, otherwise `createdAt`.
    pub fn effective_date(&self) -> Option<&str> {
        self.date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .or(self.created_at.as_deref())
    }

    pub fn effective_instant<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_instant(self.effective_date()?, tz)
    }

    pub fn effective_day<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.effective_instant(tz).map(|instant| instant.date_naive())
    }

    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }

    /// Checks the contract every aggregated entry must satisfy and returns its
    /// local effective day.
    pub fn checked_day<Tz: TimeZone>(&self, tz: &Tz) -> Result<NaiveDate, JournalError> {
        if !self.has_valid_rating() {
            return Err(JournalError::invalid_input(format!(
                "entry {} has rating {} outside {MIN_RATING}..={MAX_RATING}",
                self.id, self.rating
            )));
        }
        let raw = self.effective_date().unwrap_or_default();
        self.effective_day(tz).ok_or_else(|| {
            JournalError::invalid_input(format!("entry {} has unparseable date {raw:?}", self.id))
        })
    }
}

/// Write payload the API accepts for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMoodEntry {
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
}

/// What a client posts to this service: date and time-of-day arrive separately
/// and are combined with the configured offset before forwarding.
#[derive(Debug, Clone, Deserialize)]
pub struct MoodSubmission {
    pub rating: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub moods: Vec<MoodEntry>,
    pub average_mood: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub id: String,
    pub name: String,
    pub icon: IconKey,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_entries: usize,
    pub average_mood: f64,
    pub streak_days: u32,
    pub weekly_goal: u32,
    pub completed_this_week: usize,
    pub best_day: Option<String>,
    pub worst_day: Option<String>,
    pub top_tags: Vec<TagCount>,
}

impl StatsSummary {
    pub fn empty(weekly_goal: u32) -> Self {
        Self {
            total_entries: 0,
            average_mood: 0.0,
            streak_days: 0,
            weekly_goal,
            completed_this_week: 0,
            best_day: None,
            worst_day: None,
            top_tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub average_mood: f64,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingCount {
    pub rating: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub range: String,
    pub start: String,
    pub end: String,
    pub summary: StatsSummary,
    pub distribution: Vec<RatingCount>,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub entries: Vec<MoodEntry>,
    pub average_mood: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub week_start: String,
    pub days: Vec<DayBucket>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub range: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn entry(date: Option<&str>, created_at: Option<&str>) -> MoodEntry {
        MoodEntry {
            id: "m1".into(),
            rating: 3,
            note: None,
            tags: Vec::new(),
            date: date.map(Into::into),
            created_at: created_at.map(Into::into),
            updated_at: None,
            user_id: None,
        }
    }

    #[test]
    fn date_takes_precedence_over_created_at() {
        let both = entry(Some("2024-01-01T10:00:00-03:00"), Some("2024-01-05T10:00:00-03:00"));
        assert_eq!(both.effective_date(), Some("2024-01-01T10:00:00-03:00"));

        let only_created = entry(None, Some("2024-01-05T10:00:00-03:00"));
        assert_eq!(only_created.effective_date(), Some("2024-01-05T10:00:00-03:00"));

        let blank_date = entry(Some("  "), Some("2024-01-05"));
        assert_eq!(blank_date.effective_date(), Some("2024-01-05"));
    }

    #[test]
    fn checked_day_rejects_bad_records() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let mut bad_rating = entry(Some("2024-01-01"), None);
        bad_rating.rating = 6;
        assert!(matches!(bad_rating.checked_day(&tz), Err(JournalError::InvalidInput(_))));

        let bad_date = entry(Some("yesterday-ish"), None);
        assert!(matches!(bad_date.checked_day(&tz), Err(JournalError::InvalidInput(_))));

        let fine = entry(Some("2024-01-01"), None);
        assert_eq!(fine.checked_day(&tz).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn api_payload_deserializes_camel_case() {
        let raw = r#"{
            "id": "abc",
            "rating": 4,
            "note": "walked the dog",
            "tags": [{"id": "t1", "name": "Work", "icon": "briefcase"}],
            "createdAt": "2024-01-02T08:00:00.000Z",
            "userId": "u1"
        }"#;
        let parsed: MoodEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.created_at.as_deref(), Some("2024-01-02T08:00:00.000Z"));
        assert_eq!(parsed.date, None);
        assert_eq!(parsed.tags[0].icon_key(), IconKey::Briefcase);
    }

    #[test]
    fn unknown_icons_fall_back_to_tag() {
        assert_eq!(IconKey::from_name("Home"), IconKey::Home);
        assert_eq!(IconKey::from_name("sparkles"), IconKey::Tag);
        assert_eq!(serde_json::to_value(IconKey::Dumbbell).unwrap(), "dumbbell");
    }

    #[test]
    fn responses_serialize_camel_case() {
        let summary = serde_json::to_value(StatsSummary::empty(7)).unwrap();
        for key in ["totalEntries", "averageMood", "streakDays", "weeklyGoal", "topTags"] {
            assert!(summary.get(key).is_some(), "missing {key}");
        }
        assert!(summary.get("total_entries").is_none());

        let bucket = DayBucket {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            is_current_month: true,
            is_today: false,
            moods: Vec::new(),
            average_mood: None,
        };
        let bucket = serde_json::to_value(bucket).unwrap();
        assert_eq!(bucket["date"], "2024-01-01");
        assert_eq!(bucket["isCurrentMonth"], true);
        assert_eq!(bucket["isToday"], false);
        assert!(bucket["averageMood"].is_null());
    }
}
