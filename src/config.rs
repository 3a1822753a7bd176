use crate::dates::parse_utc_offset;
use crate::errors::{JournalError, Result};
use chrono::{FixedOffset, Weekday};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Knobs the aggregators read. Passed explicitly so the pure functions never
/// consult the environment.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    pub week_start: Weekday,
    pub weekly_goal: u32,
    /// Upper bound on days walked back when counting a streak.
    pub streak_cap_days: u32,
    pub top_tag_limit: usize,
    /// Relative analytics windows: token and its length in days.
    pub ranges: Vec<(String, u32)>,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            weekly_goal: 7,
            streak_cap_days: 30,
            top_tag_limit: 5,
            ranges: [("7d", 7), ("30d", 30), ("90d", 90), ("1y", 365), ("365d", 365)]
                .into_iter()
                .map(|(token, days)| (token.to_string(), days))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ApiAuth {
    Token(String),
    Login { email: String, password: String },
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
    pub api_auth: ApiAuth,
    pub api_timeout: Duration,
    /// Offset written onto every timestamp sent to the API.
    pub utc_offset: FixedOffset,
    pub settings: JournalSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = parse_or(var("PORT"), "PORT", 8080u16)?;
        let api_url = var("MOOD_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let credentials = (
            var("MOOD_API_TOKEN"),
            var("MOOD_API_EMAIL"),
            var("MOOD_API_PASSWORD"),
        );
        let api_auth = match credentials {
            (Some(token), _, _) => ApiAuth::Token(token),
            (None, Some(email), Some(password)) => ApiAuth::Login { email, password },
            (None, Some(_), None) => {
                return Err(JournalError::Config(
                    "MOOD_API_EMAIL is set but MOOD_API_PASSWORD is missing".to_string(),
                ));
            }
            _ => ApiAuth::Anonymous,
        };

        let timeout_secs = parse_or(var("MOOD_API_TIMEOUT_SECS"), "MOOD_API_TIMEOUT_SECS", 10u64)?;
        let api_timeout = Duration::from_secs(timeout_secs);

        let utc_offset = match var("MOOD_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                JournalError::Config(format!("MOOD_UTC_OFFSET must look like -03:00, got {raw:?}"))
            })?,
            None => FixedOffset::west_opt(3 * 3600)
                .ok_or_else(|| JournalError::Config("default offset out of range".to_string()))?,
        };

        let defaults = JournalSettings::default();
        let week_start = match var("MOOD_WEEK_START") {
            Some(raw) => raw.trim().parse::<Weekday>().map_err(|_| {
                JournalError::Config(format!("MOOD_WEEK_START must be a weekday, got {raw:?}"))
            })?,
            None => defaults.week_start,
        };

        let settings = JournalSettings {
            week_start,
            weekly_goal: parse_or(
                var("MOOD_WEEKLY_GOAL"),
                "MOOD_WEEKLY_GOAL",
                defaults.weekly_goal,
            )?,
            streak_cap_days: parse_or(
                var("MOOD_STREAK_CAP_DAYS"),
                "MOOD_STREAK_CAP_DAYS",
                defaults.streak_cap_days,
            )?,
            top_tag_limit: parse_or(var("MOOD_TOP_TAGS"), "MOOD_TOP_TAGS", defaults.top_tag_limit)?,
            ranges: defaults.ranges,
        };

        Ok(Self {
            port,
            api_url,
            api_auth,
            api_timeout,
            utc_offset,
            settings,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| JournalError::Config(format!("{key} has invalid value {raw:?}"))),
        None => Ok(default),
    }
}
