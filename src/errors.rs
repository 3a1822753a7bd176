use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Failure kinds surfaced by the journal core and its API collaborator.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("mood api unreachable: {0}")]
    Unreachable(String),

    #[error("rejected by mood api ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unknown time range {0:?}")]
    InvalidRange(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;

impl JournalError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Unreachable(_) => "unreachable",
            Self::Rejected { .. } => "rejected",
            Self::InvalidRange(_) => "invalid_range",
            Self::Config(_) => "config",
        }
    }

    /// Message suitable for showing to the person using the journal.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::NotFound(_) => "The requested entry was not found.".to_string(),
            Self::Unreachable(_) => {
                "The mood service is unavailable. Please try again later.".to_string()
            }
            Self::Rejected { status: 401, .. } => {
                "You are not signed in. Please log in again.".to_string()
            }
            Self::Rejected { status: 403, .. } => {
                "You do not have permission to do that.".to_string()
            }
            Self::Rejected { status: 429, .. } => {
                "Too many requests. Please try again later.".to_string()
            }
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => {
                "The request was rejected. Please check your input.".to_string()
            }
            Self::InvalidRange(token) => format!("Unknown time range {token:?}."),
            Self::Config(_) => "The journal service is misconfigured.".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidRange(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        Self {
            status: err.status(),
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "error": self.kind, "message": self.message });
        (self.status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_statuses() {
        assert_eq!(JournalError::invalid_input("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(JournalError::InvalidRange("2w".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(JournalError::NotFound("m1".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(JournalError::Unreachable("refused".into()).status(), StatusCode::BAD_GATEWAY);
        let rejected = JournalError::Rejected { status: 422, message: "rating required".into() };
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn rejected_messages_prefer_server_text() {
        let rejected = JournalError::Rejected { status: 400, message: "rating required".into() };
        assert_eq!(rejected.user_message(), "rating required");

        let unauthorized = JournalError::Rejected { status: 401, message: "jwt expired".into() };
        assert!(unauthorized.user_message().contains("log in"));

        let silent = JournalError::Rejected { status: 422, message: String::new() };
        assert!(silent.user_message().contains("rejected"));
    }

    #[test]
    fn app_error_carries_kind() {
        let err = AppError::from(JournalError::InvalidRange("2w".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, "invalid_range");
        assert!(err.message.contains("2w"));
    }
}
