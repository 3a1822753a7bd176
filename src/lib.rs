pub mod analytics;
pub mod app;
pub mod calendar;
pub mod client;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod stats;

pub use analytics::{TimeWindow, build_report};
pub use app::router;
pub use calendar::build_month_grid;
pub use client::HttpMoodRepository;
pub use config::{Config, JournalSettings};
pub use errors::{AppError, JournalError};
pub use repository::{DateRange, MoodRepository};
pub use state::AppState;
pub use stats::compute_stats;
