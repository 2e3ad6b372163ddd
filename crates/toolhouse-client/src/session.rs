//! Agent session: identity, conversation state, and request issuance.

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Error, Result};
use crate::request::{MessageBody, RequestConfig};
use crate::send::SendRequest;

/// Default base URL for the Toolhouse Agents service.
const DEFAULT_BASE_URL: &str = "https://agents.toolhouse.ai";

/// Response header carrying the server-issued run id.
pub(crate) const RUN_ID_HEADER: &str = "x-toolhouse-run-id";

/// A conversation session with one Toolhouse agent.
///
/// Owns the agent identity and the server-issued run id that correlates
/// messages into an ongoing conversation. The first send of a session
/// creates the conversation (`POST {base}/{agent}`); once the server has
/// issued a run id, every later send continues it
/// (`PUT {base}/{agent}/{run_id}`).
///
/// Cloning is cheap and clones share conversation state. Distinct sessions
/// share nothing, even when they name the same agent.
///
/// # Example
///
/// ```no_run
/// use toolhouse_client::AgentSession;
///
/// # async fn example() -> toolhouse_client::Result<()> {
/// let session = AgentSession::new("my-agent");
///
/// // Full response as one string.
/// let reply = session.send("Hello!").await?;
///
/// // Or stream fragments as they arrive.
/// use futures::StreamExt;
/// let mut fragments = session.send("Tell me a story").stream();
/// while let Some(fragment) = fragments.next().await {
///     print!("{}", fragment?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AgentSession {
    /// Inner shared state.
    inner: Arc<SessionInner>,
}

/// Inner session state (shared across clones).
pub(crate) struct SessionInner {
    /// HTTP client.
    http: reqwest::Client,
    /// Base URL, no trailing slash.
    base_url: String,
    /// Bare agent identifier (base-URL prefix stripped).
    agent_id: String,
    /// Query parameters recorded at construction, copied onto every URL.
    query: Vec<(&'static str, String)>,
    /// Server-issued conversation id. Written once by the first response
    /// that carries one; only [`AgentSession::set_run_id`] overwrites.
    run_id: Mutex<Option<String>>,
}

impl AgentSession {
    /// Create a session with default settings.
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self::builder(agent_id).build()
    }

    /// Create a new session builder.
    pub fn builder(agent_id: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(agent_id)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Get the bare agent identifier.
    pub fn agent_id(&self) -> &str {
        &self.inner.agent_id
    }

    /// Get the current run id, if the conversation has one.
    pub fn run_id(&self) -> Option<String> {
        self.inner.run_id.lock().clone()
    }

    /// Replace the run id unconditionally.
    ///
    /// Later sends continue the conversation named by `id`.
    pub fn set_run_id(&self, id: impl Into<String>) {
        *self.inner.run_id.lock() = Some(id.into());
    }

    /// Send a message to the agent.
    ///
    /// No I/O happens here. The returned [`SendRequest`] is consumed either
    /// by awaiting it (full response as one string) or by calling
    /// [`SendRequest::stream`] (fragments as they arrive); each use issues
    /// its own independent request.
    pub fn send(&self, message: impl Into<String>) -> SendRequest {
        SendRequest::new(self.inner.clone(), message.into())
    }

    /// Send an empty message (body `{"message": ""}`).
    pub fn send_empty(&self) -> SendRequest {
        SendRequest::new(self.inner.clone(), String::new())
    }
}

impl SessionInner {
    /// Derive the target URL and method from current conversation state.
    pub(crate) fn request_config(&self) -> RequestConfig {
        let run_id = self.run_id.lock().clone();
        match run_id {
            None => RequestConfig::create(
                self.with_query(format!("{}/{}", self.base_url, self.agent_id)),
            ),
            Some(id) => RequestConfig::resume(
                self.with_query(format!("{}/{}/{}", self.base_url, self.agent_id, id)),
            ),
        }
    }

    fn with_query(&self, url: String) -> String {
        if self.query.is_empty() {
            return url;
        }
        let qs = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{}", url, qs)
    }

    /// Issue one request and check its status.
    ///
    /// On success the run id header is captured (first writer wins) and the
    /// response is handed back with its body untouched, ready for either
    /// consumption mode.
    pub(crate) async fn execute(&self, body: &MessageBody) -> Result<reqwest::Response> {
        let config = self.request_config();
        tracing::debug!(url = %config.url, method = %config.method, "sending agent request");

        let response = self
            .http
            .request(config.method, &config.url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::status(response.status().as_u16()));
        }

        self.capture_run_id(&response);
        Ok(response)
    }

    /// Record the server-issued run id, unless one is already set.
    fn capture_run_id(&self, response: &reqwest::Response) {
        let header = response
            .headers()
            .get(RUN_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        if let Some(id) = header {
            if !id.is_empty() {
                let mut run_id = self.run_id.lock();
                if run_id.is_none() {
                    *run_id = Some(id.to_string());
                }
            }
        }
    }
}

/// Builder for creating an [`AgentSession`].
///
/// Construction never fails and performs no network I/O; a malformed agent
/// identifier is accepted as-is and only surfaces when a send is attempted.
#[derive(Debug)]
pub struct SessionBuilder {
    agent_id: String,
    base_url: String,
    env: Option<String>,
    toolhouse_id: Option<String>,
    bundle: Option<String>,
}

impl SessionBuilder {
    fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            env: None,
            toolhouse_id: None,
            bundle: None,
        }
    }

    /// Override the base URL for the agents service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `env` query parameter.
    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Set the `toolhouse_id` query parameter.
    pub fn toolhouse_id(mut self, id: impl Into<String>) -> Self {
        self.toolhouse_id = Some(id.into());
        self
    }

    /// Set the `bundle` query parameter.
    pub fn bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    /// Build the session.
    pub fn build(self) -> AgentSession {
        let base_url = self.base_url.trim_end_matches('/').to_string();

        // Callers sometimes paste the full agent URL; reduce it to the bare
        // identifier.
        let agent_id = match self.agent_id.strip_prefix(&base_url) {
            Some(rest) => rest.trim_start_matches('/').to_string(),
            None => self.agent_id,
        };

        let mut query = Vec::new();
        if let Some(env) = self.env {
            query.push(("env", env));
        }
        if let Some(id) = self.toolhouse_id {
            query.push(("toolhouse_id", id));
        }
        if let Some(bundle) = self.bundle {
            query.push(("bundle", bundle));
        }

        AgentSession {
            inner: Arc::new(SessionInner {
                http: reqwest::Client::new(),
                base_url,
                agent_id,
                query,
                run_id: Mutex::new(None),
            }),
        }
    }
}
