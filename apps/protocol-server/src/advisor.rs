//! Clause advisor backed by the GigaChat chat-completions API
//!
//! The API uses a two-step flow: the long-lived authorization key is exchanged
//! for a short-lived access token at the OAuth endpoint, and the token is then
//! sent as a bearer credential with each completion request. Tokens are cached
//! until shortly before they expire.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_API_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
pub const DEFAULT_SCOPE: &str = "GIGACHAT_API_PERS";
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Refresh the token this long before the server-side expiry
const TOKEN_EXPIRY_MARGIN_MS: i64 = 60_000;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("GIGACHAT_CLIENT_SECRET is not configured")]
    NotConfigured,

    #[error("authorization failed")]
    Unauthorized,

    #[error("access forbidden")]
    Forbidden,

    #[error("request rate limit exceeded")]
    RateLimited,

    #[error("advisor returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("advisor transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected advisor response format")]
    UnexpectedFormat,
}

/// Map a non-success HTTP status to an advisor error.
pub fn classify_status(status: StatusCode, body: &str) -> AdvisorError {
    match status {
        StatusCode::UNAUTHORIZED => AdvisorError::Unauthorized,
        StatusCode::FORBIDDEN => AdvisorError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => AdvisorError::RateLimited,
        other => AdvisorError::Http {
            status: other.as_u16(),
            body: body.chars().take(200).collect(),
        },
    }
}

/// Something that can review a contract clause prompt and answer in text
#[async_trait]
pub trait ClauseAdvisor: Send + Sync {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisorError>;
}

#[derive(Debug, Clone)]
pub struct GigaChatConfig {
    /// Base64 authorization key; `None` disables the advisor
    pub credentials: Option<String>,
    pub scope: String,
    pub auth_url: String,
    pub api_url: String,
    pub model: String,
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

impl Default for GigaChatConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            accept_invalid_certs: false,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AccessToken {
    access_token: String,
    /// Unix time in milliseconds
    expires_at: i64,
}

impl AccessToken {
    fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires_at - TOKEN_EXPIRY_MARGIN_MS > now_ms
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct GigaChatAdvisor {
    client: reqwest::Client,
    config: GigaChatConfig,
    token: Mutex<Option<AccessToken>>,
}

impl GigaChatAdvisor {
    pub fn new(config: GigaChatConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials.is_some()
    }

    async fn access_token(&self, credentials: &str) -> Result<String, AdvisorError> {
        let mut cached = self.token.lock().await;
        let now_ms = chrono::Utc::now().timestamp_millis();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now_ms)) {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting GigaChat access token");
        let response = self
            .client
            .post(&self.config.auth_url)
            .header("Authorization", format!("Basic {}", credentials))
            .header("RqUID", uuid::Uuid::new_v4().to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.config.scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let token: AccessToken = response.json().await?;
        let value = token.access_token.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[async_trait]
impl ClauseAdvisor for GigaChatAdvisor {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisorError> {
        let credentials = self
            .config
            .credentials
            .as_deref()
            .ok_or(AdvisorError::NotConfigured)?;

        let token = self.access_token(credentials).await?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                // token revoked early; next call fetches a new one
                *self.token.lock().await = None;
            }
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status, &body);
            warn!("GigaChat request failed: {}", err);
            return Err(err);
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AdvisorError::UnexpectedFormat)
    }
}
