use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/moods", get(handlers::list_moods).post(handlers::create_mood))
        .route(
            "/api/moods/:id",
            get(handlers::get_mood)
                .put(handlers::update_mood)
                .delete(handlers::delete_mood),
        )
        .route("/api/tags", get(handlers::list_tags))
        .with_state(state)
}
