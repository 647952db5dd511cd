use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::errors::{RecoveryError, Result};

/// One GET request against a remote item source.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl JsonRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout,
            user_agent: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }
}

/// Appends `segments` to `base`, each percent-encoded as exactly one path
/// component. Empty and dot segments would address a different resource, so
/// they are reported as not found without a request being made.
pub fn segment_url(base: &str, segments: &[&str]) -> Result<String> {
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(RecoveryError::NotFound(format!(
            "{:?} cannot name an item path",
            segment
        )));
    }
    let mut url = Url::parse(base)
        .map_err(|e| RecoveryError::Config(format!("invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| RecoveryError::Config(format!("base URL {} cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}

/// Fetches and parses JSON, classifying every failure into the
/// provider-boundary taxonomy (timeout, connection, status, malformed body).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, request: &JsonRequest) -> Result<serde_json::Value>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, request: &JsonRequest) -> Result<serde_json::Value> {
        let mut builder = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(user_agent) = &request.user_agent {
            builder = builder.header("User-Agent", user_agent);
        }

        debug!(url = %request.url, timeout_ms = request.timeout.as_millis() as u64, "sending request");
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %request.url, status = status.as_u16(), "response received");

        if status == StatusCode::NOT_FOUND {
            return Err(RecoveryError::NotFound(request.url.clone()));
        }
        if !status.is_success() {
            return Err(RecoveryError::BadStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            RecoveryError::MalformedResponse(format!("invalid JSON from {}: {}", request.url, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = JsonRequest::get("https://example.test/items", Duration::from_secs(20))
            .with_query("search", "minecraft:dirt")
            .with_user_agent("agent/1.0");
        assert_eq!(request.query, vec![("search".to_string(), "minecraft:dirt".to_string())]);
        assert_eq!(request.user_agent.as_deref(), Some("agent/1.0"));
        assert_eq!(request.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_segment_url_encodes_one_component() {
        assert_eq!(
            segment_url("https://api.test/v1/", &["items", "minecraft:stone"]).unwrap(),
            "https://api.test/v1/items/minecraft:stone"
        );
        assert_eq!(
            segment_url("https://api.test/v1", &["items", "a/../b?c=1#d"]).unwrap(),
            "https://api.test/v1/items/a%2F..%2Fb%3Fc=1%23d"
        );
        assert_eq!(
            segment_url("https://api.test", &["items", "ruby gem"]).unwrap(),
            "https://api.test/items/ruby%20gem"
        );
    }

    #[test]
    fn test_segment_url_rejects_dot_and_empty_ids() {
        for id in ["", ".", ".."] {
            let err = segment_url("https://api.test/v1", &["items", id]).unwrap_err();
            assert!(matches!(err, RecoveryError::NotFound(_)), "{:?}", err);
            assert!(err.is_stage_miss());
        }
        assert!(matches!(
            segment_url("not a url", &["items", "x"]),
            Err(RecoveryError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_stage_miss() {
        let transport = HttpTransport::new();
        // Port 1 on loopback refuses connections.
        let request = JsonRequest::get("http://127.0.0.1:1/items/x", Duration::from_secs(2));
        let err = transport.get_json(&request).await.unwrap_err();
        assert!(err.is_stage_miss(), "unexpected error: {:?}", err);
    }
}
