//! REST client for the remote mood API.

use crate::config::{ApiAuth, Config};
use crate::errors::{JournalError, Result};
use crate::models::{AuthResponse, Credentials, MoodEntry, NewMoodEntry, TagGroup};
use crate::repository::{DateRange, MoodRepository};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`MoodRepository`] over the API's JSON endpoints, with the bearer token
/// attached to every request.
pub struct HttpMoodRepository {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpMoodRepository {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| JournalError::Config(format!("invalid api token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| JournalError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the client for `config`, logging in first when credentials
    /// rather than a token were supplied.
    pub async fn connect(config: &Config) -> Result<Self> {
        match &config.api_auth {
            ApiAuth::Token(token) => Self::new(&config.api_url, Some(token), config.api_timeout),
            ApiAuth::Anonymous => Self::new(&config.api_url, None, config.api_timeout),
            ApiAuth::Login { email, password } => {
                let credentials = Credentials {
                    email: email.clone(),
                    password: password.clone(),
                };
                let auth = login(&config.api_url, &credentials, config.api_timeout).await?;
                info!(user = %auth.user.email, "logged in to mood api");
                Self::new(&config.api_url, Some(&auth.token), config.api_timeout)
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = send(request, what).await?;
        response
            .json()
            .await
            .map_err(|e| JournalError::Unreachable(format!("malformed response for {what}: {e}")))
    }
}

/// Exchanges credentials for a bearer token.
pub async fn login(
    base_url: &str,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<AuthResponse> {
    let client = HttpMoodRepository::new(base_url, None, timeout)?;
    let request = client.http_client.post(client.url("/auth/login")).json(credentials);
    client.fetch(request, "login").await
}

async fn send(request: RequestBuilder, what: &str) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| JournalError::Unreachable(format!("{what}: {e}")))?;

    let status = response.status();
    debug!(%status, "{what}");
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(JournalError::NotFound(what.to_string()));
    }
    // A failing upstream says nothing about the request; its body is not shown.
    if status.is_server_error() {
        return Err(JournalError::Unreachable(format!("{what}: upstream returned {status}")));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text);
    Err(JournalError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl MoodRepository for HttpMoodRepository {
    async fn list_entries(&self, filter: Option<&DateRange>) -> Result<Vec<MoodEntry>> {
        let mut request = self.http_client.get(self.url("/moods"));
        if let Some(range) = filter {
            request = request.query(&[
                ("startDate", range.start.to_rfc3339()),
                ("endDate", range.end.to_rfc3339()),
            ]);
        }
        self.fetch(request, "list moods").await
    }

    async fn get_entry(&self, id: &str) -> Result<MoodEntry> {
        let request = self.http_client.get(self.url(&format!("/moods/{id}")));
        self.fetch(request, &format!("mood {id}")).await
    }

    async fn create_entry(&self, entry: &NewMoodEntry) -> Result<MoodEntry> {
        let request = self.http_client.post(self.url("/moods")).json(entry);
        self.fetch(request, "create mood").await
    }

    async fn update_entry(&self, id: &str, entry: &NewMoodEntry) -> Result<MoodEntry> {
        let request = self.http_client.put(self.url(&format!("/moods/{id}"))).json(entry);
        self.fetch(request, &format!("mood {id}")).await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let request = self.http_client.delete(self.url(&format!("/moods/{id}")));
        send(request, &format!("mood {id}")).await?;
        Ok(())
    }

    async fn list_tag_groups(&self) -> Result<Vec<TagGroup>> {
        let request = self.http_client.get(self.url("/tags"));
        self.fetch(request, "list tag groups").await
    }
}
