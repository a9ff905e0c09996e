use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::external::upstream::{UpstreamClient, UpstreamClientError, UpstreamResponse};

/// reqwest-backed provider client. The API key, when present, rides along as
/// the `apikey` query parameter on every call.
pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpUpstream {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, UpstreamClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        })
    }

    pub(crate) fn build_url(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, UpstreamClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamClientError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        // An empty query_pairs_mut() still leaves a dangling '?'
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn fetch(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<UpstreamResponse, UpstreamClientError> {
        let url = self.build_url(segments, params)?;
        debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamClientError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamClientError::Network(e.to_string()))?;

        Ok(UpstreamResponse::new(status, body))
    }
}
