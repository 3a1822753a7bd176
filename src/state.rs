use crate::config::Config;
use crate::repository::MoodRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn MoodRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: Arc<dyn MoodRepository>, config: Config) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
