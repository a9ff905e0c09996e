use async_trait::async_trait;
use http::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Raw answer from an upstream provider. Non-2xx statuses are data, not errors.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UpstreamClientError> {
        serde_json::from_str(&self.body).map_err(|e| UpstreamClientError::Parse(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum UpstreamClientError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One GET against a provider: `segments` are appended to the provider's base
/// URL as path segments, `params` become the query string.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<UpstreamResponse, UpstreamClientError>;
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use parking_lot::Mutex;

    /// A request as the stub saw it: path segments and query params.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub segments: Vec<String>,
        pub params: Vec<(String, String)>,
    }

    /// Canned-response upstream for tests. `None` simulates a transport failure.
    pub struct StubUpstream {
        response: Option<UpstreamResponse>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl StubUpstream {
        pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
            Self {
                response: Some(UpstreamResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn unreachable() -> Self {
            Self {
                response: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl UpstreamClient for StubUpstream {
        async fn fetch(
            &self,
            segments: &[&str],
            params: &[(&str, &str)],
        ) -> Result<UpstreamResponse, UpstreamClientError> {
            self.requests.lock().push(RecordedRequest {
                segments: segments.iter().map(|s| s.to_string()).collect(),
                params: params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            });
            self.response
                .clone()
                .ok_or_else(|| UpstreamClientError::Network("connection refused".into()))
        }
    }
}
