// Mastodon API client
//
// Thin wrapper over reqwest for the four endpoints the client talks to:
// the batch timeline, the streaming timeline, posting, and the account
// check used at startup. The HTTP client itself has no overall timeout
// because the streaming body is read for the life of the process; one-shot
// requests set their own.

use crate::compose::Toot;
use crate::config::{TimelineScope, VERSION};
use anyhow::{Context, Result};
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use std::time::Duration;

const STREAM_PREFIX: &str = "api/v1/streaming/";
const TIMELINE_PREFIX: &str = "api/v1/timelines/";
const STATUSES: &str = "api/v1/statuses";
const VERIFY_CREDENTIALS: &str = "api/v1/accounts/verify_credentials";

/// Timeout for request/response calls (everything except the stream)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("nanotoot/{}", VERSION)
}

/// Build the shared HTTP client
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent())
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(50))
        .build()
        .context("Failed to create HTTP client")
}

/// Base URL for a server. A bare domain gets `https://`.
pub fn base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        format!("{}/", domain)
    } else {
        format!("https://{}/", domain)
    }
}

/// Authenticated client for one account on one server
#[derive(Clone)]
pub struct MastodonClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl std::fmt::Debug for MastodonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MastodonClient")
            .field("base", &self.base)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl MastodonClient {
    pub fn new(domain: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base: base_url(domain),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Fetch the latest batch of statuses for `scope`, newest first
    pub async fn timeline(&self, scope: TimelineScope) -> Result<Value> {
        let url = self.url(&format!("{}{}", TIMELINE_PREFIX, scope.timeline_path()));
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Timeline request to {} failed", url))?
            .error_for_status()
            .context("Timeline request rejected")?;

        response
            .json::<Value>()
            .await
            .context("Timeline response is not valid JSON")
    }

    /// Open the streaming endpoint for `scope`.
    ///
    /// The returned stream yields body chunks as they arrive, at arbitrary
    /// boundaries, and ends only when the server closes the connection.
    pub async fn stream(
        &self,
        scope: TimelineScope,
    ) -> Result<BoxStream<'static, reqwest::Result<Bytes>>> {
        let url = self.url(&format!("{}{}", STREAM_PREFIX, scope.stream_path()));
        tracing::info!("Connecting to {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Stream connection to {} failed", url))?
            .error_for_status()
            .context("Stream connection rejected")?;

        Ok(response.bytes_stream().boxed())
    }

    /// Post a status
    pub async fn post_status(&self, toot: &Toot) -> Result<Value> {
        let url = self.url(STATUSES);
        tracing::debug!("POST {} ({})", url, toot.visibility.as_str());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .form(toot)
            .send()
            .await
            .context("Post request failed")?
            .error_for_status()
            .context("Post rejected by server")?;

        response
            .json::<Value>()
            .await
            .context("Post response is not valid JSON")
    }

    /// The account the token belongs to
    pub async fn verify_credentials(&self) -> Result<Value> {
        let response = self
            .http
            .get(self.url(VERIFY_CREDENTIALS))
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("Account check failed")?
            .error_for_status()
            .context("Access token rejected")?;

        response
            .json::<Value>()
            .await
            .context("Account response is not valid JSON")
    }
}
