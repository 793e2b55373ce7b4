//! HTTP plumbing shared by every endpoint.

use std::time::Instant;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::SessionGuard;

/// Longest body excerpt kept as an error detail.
const MAX_DETAIL_LEN: usize = 300;

/// Blocking client for the scoring service.
///
/// One request at a time; every call blocks until the response arrives or the
/// configured timeout elapses.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: SessionGuard,
}

impl ApiClient {
    /// Create a client over the given session.
    pub fn new(config: ClientConfig, session: SessionGuard) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.config.endpoint(path))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.config.endpoint(path))
    }

    /// Send a request and log its outcome.
    pub(crate) fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let response = request.send().map_err(|e| {
            debug!(endpoint, error = %e, "request failed");
            ClientError::from(e)
        })?;
        debug!(
            endpoint,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        Ok(response)
    }

    /// Like [`Self::send`] for endpoints that need the bearer token.
    ///
    /// Fails with `Unauthenticated` before sending when no token exists. A 401
    /// response invalidates the session and yields `AuthExpired`.
    pub(crate) fn send_authenticated(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let token = self.session.require_auth()?;
        let response = self.send(endpoint, request.bearer_auth(token))?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(ClientError::AuthExpired);
        }
        Ok(response)
    }
}

/// Map a non-success response to [`ClientError::Api`].
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

/// Parse a success body as JSON.
pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Prefers a JSON `detail` field (string as-is, anything else as JSON text);
/// falls back to the trimmed body, cut to a reasonable length.
pub fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed)
        && let Some(detail) = value.get("detail")
    {
        return match detail {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        };
    }
    Some(trimmed.chars().take(MAX_DETAIL_LEN).collect())
}
