use crate::analytics::{DEFAULT_RANGE, TimeWindow, build_report};
use crate::calendar::{average_rating, build_month_grid, month_reference};
use crate::dates::{
    combine_to_iso_with_offset, is_in_future, local_day_bounds, parse_instant, to_local_date_key,
    to_local_time_key,
};
use crate::errors::{AppError, JournalError};
use crate::models::{
    AnalyticsQuery, AnalyticsReport, CalendarQuery, CalendarResponse, MAX_RATING, MIN_RATING,
    MoodEntry, MoodSubmission, NewMoodEntry, StatsSummary, TagGroup, TodayResponse,
};
use crate::repository::DateRange;
use crate::state::AppState;
use crate::stats::compute_stats;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone};
use serde_json::{json, Value};
use tracing::info;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let now = Local::now();
    let today = now.date_naive();
    // The upstream filter only narrows the transfer; the day check below decides.
    let range = local_day_bounds(&Local, today).map(|(start, next_midnight)| DateRange {
        start: start.fixed_offset(),
        end: next_midnight.fixed_offset(),
    });
    let entries = state.repository.list_entries(range.as_ref()).await?;

    let entries: Vec<MoodEntry> = entries
        .into_iter()
        .filter(|entry| entry.effective_day(&Local) == Some(today))
        .collect();

    Ok(Json(TodayResponse {
        date: to_local_date_key(&now),
        average_mood: average_rating(&entries),
        entries,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSummary>, AppError> {
    let entries = state.repository.list_entries(None).await?;
    Ok(Json(compute_stats(&entries, &Local::now(), &state.config.settings)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let now = Local::now();
    let reference = month_reference(
        query.year.unwrap_or_else(|| now.year()),
        query.month.unwrap_or_else(|| now.month()),
    )?;
    let entries = state.repository.list_entries(None).await?;
    let week_start = state.config.settings.week_start;

    Ok(Json(CalendarResponse {
        year: reference.year(),
        month: reference.month(),
        week_start: week_start.to_string(),
        days: build_month_grid(&entries, reference, &now, week_start)?,
    }))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let now = Local::now();
    let token = query.range.as_deref().unwrap_or(DEFAULT_RANGE);
    let window = TimeWindow::resolve(token, &now, &state.config.settings)?;
    let entries = state.repository.list_entries(Some(&window.date_range())).await?;
    Ok(Json(build_report(&entries, token, &now, &state.config.settings)?))
}

pub async fn list_moods(State(state): State<AppState>) -> Result<Json<Vec<MoodEntry>>, AppError> {
    Ok(Json(state.repository.list_entries(None).await?))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MoodEntry>, AppError> {
    Ok(Json(state.repository.get_entry(&id).await?))
}

pub async fn create_mood(
    State(state): State<AppState>,
    Json(payload): Json<MoodSubmission>,
) -> Result<(StatusCode, Json<MoodEntry>), AppError> {
    let entry = prepare_entry(payload, &Local::now(), state.config.utc_offset)?;
    let created = state.repository.create_entry(&entry).await?;
    info!(id = %created.id, rating = created.rating, "mood recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_mood(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MoodSubmission>,
) -> Result<Json<MoodEntry>, AppError> {
    let entry = prepare_entry(payload, &Local::now(), state.config.utc_offset)?;
    let updated = state.repository.update_entry(&id, &entry).await?;
    info!(id = %updated.id, rating = updated.rating, "mood updated");
    Ok(Json(updated))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_entry(&id).await?;
    info!(%id, "mood deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagGroup>>, AppError> {
    Ok(Json(state.repository.list_tag_groups().await?))
}

/// Validates a submission and turns it into the API's write payload. A
/// missing time-of-day means "now" as read on the `offset` clock; moments
/// after `now` are refused.
pub fn prepare_entry<Tz: TimeZone>(
    submission: MoodSubmission,
    now: &DateTime<Tz>,
    offset: FixedOffset,
) -> Result<NewMoodEntry, JournalError> {
    if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
        return Err(JournalError::invalid_input(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let time = submission
        .time
        .filter(|time| !time.trim().is_empty())
        .unwrap_or_else(|| to_local_time_key(&now.with_timezone(&offset)));
    let date = combine_to_iso_with_offset(&submission.date, &time, offset);
    let moment = parse_instant(&date, &now.timezone())
        .ok_or_else(|| JournalError::invalid_input("date must be YYYY-MM-DD and time HH:MM"))?;
    if is_in_future(&moment, now) {
        return Err(JournalError::invalid_input("cannot record a mood in the future"));
    }

    let mut tags: Vec<String> = Vec::with_capacity(submission.tags.len());
    for tag in submission.tags {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(NewMoodEntry {
        rating: submission.rating,
        note: submission
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty()),
        tags,
        date,
    })
}
