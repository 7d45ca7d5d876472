//! Agent server API client
//!
//! Thin request/response mapping over the agent lifecycle endpoints. There is
//! no local validation and no retry; a non-success status becomes a
//! [`ClientError::Http`] carrying the server's detail message.

use crate::config::ApiConfig;
use crate::constants::{LAUNCH_PATH, PAUSE_PATH, PROVIDE_INPUT_PATH, RESUME_PATH, STATE_PATH};
use crate::error::{extract_detail, ClientError};
use crate::models::AgentState;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Operations offered by the agent server
///
/// The session and the polling controller only talk to this trait, so tests
/// can drive them with an in-memory implementation.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Start a new agent run for `prompt`
    async fn launch(&self, prompt: &str) -> Result<AgentState, ClientError>;

    /// Fetch the current state of agent `id`
    async fn get_state(&self, id: &str) -> Result<AgentState, ClientError>;

    /// Resume a stopped agent
    async fn resume(&self, id: &str) -> Result<AgentState, ClientError>;

    /// Pause a running agent
    async fn pause(&self, id: &str) -> Result<AgentState, ClientError>;

    /// Answer the agent's pending `ask_human` question
    async fn provide_input(&self, id: &str, answer: &str) -> Result<AgentState, ClientError>;
}

#[derive(Serialize)]
struct LaunchRequest<'a> {
    input_prompt: &'a str,
}

#[derive(Serialize)]
struct IdRequest<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct ProvideInputRequest<'a> {
    id: &'a str,
    answer: &'a str,
}

/// HTTP implementation of [`AgentApi`]
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// * `ClientError::InvalidBaseUrl` if the base URL does not parse
    /// * `ClientError::Transport` if the HTTP client cannot be constructed
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::with_client(client, &config.base_url)
    }

    /// Wrap an existing `reqwest::Client` (shared connection pool)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = crate::config::normalize_base_url(base_url);
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn state_url(&self, id: &str) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.url(STATE_PATH))
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<AgentState, ClientError> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request, "POST", path).await
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<AgentState, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            "agent_api",
            request_id = %request_id,
            method = method,
            path = %path,
        );

        async move {
            let start = Instant::now();
            tracing::debug!("Sending agent API request");

            let response = request.send().await.map_err(|e| {
                tracing::warn!(error = %e, "Agent API request failed to send");
                ClientError::Transport(e)
            })?;

            let status = response.status();
            let body = response.text().await?;

            tracing::debug!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Agent API request completed"
            );

            if !status.is_success() {
                let detail = extract_detail(&body);
                tracing::warn!(
                    status = status.as_u16(),
                    detail = %detail,
                    "Agent API returned error status"
                );
                return Err(ClientError::Http {
                    status: status.as_u16(),
                    detail,
                });
            }

            serde_json::from_str::<AgentState>(&body).map_err(|e| {
                tracing::warn!(error = %e, "Agent API response is not a valid agent state");
                ClientError::Decode(e.to_string())
            })
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl AgentApi for HttpAgentClient {
    async fn launch(&self, prompt: &str) -> Result<AgentState, ClientError> {
        self.post(LAUNCH_PATH, &LaunchRequest { input_prompt: prompt })
            .await
    }

    async fn get_state(&self, id: &str) -> Result<AgentState, ClientError> {
        let url = self.state_url(id)?;
        let path = url.path().to_string();
        self.execute(self.client.get(url), "GET", &path).await
    }

    async fn resume(&self, id: &str) -> Result<AgentState, ClientError> {
        self.post(RESUME_PATH, &IdRequest { id }).await
    }

    async fn pause(&self, id: &str) -> Result<AgentState, ClientError> {
        self.post(PAUSE_PATH, &IdRequest { id }).await
    }

    async fn provide_input(&self, id: &str, answer: &str) -> Result<AgentState, ClientError> {
        self.post(PROVIDE_INPUT_PATH, &ProvideInputRequest { id, answer })
            .await
    }
}
