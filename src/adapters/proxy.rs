//! Single-attempt request forwarding to the configured upstream.

use crate::domain::{EngineError, EngineResult};
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use tracing::debug;

/// Response headers that must not be relayed between hops.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// What came back from the upstream, in transport-neutral form so the serving
/// layer can rebuild its own response from it.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: u16,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Bytes,
}

pub struct UpstreamForwarder {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamForwarder {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exactly one attempt; any connection or response failure surfaces as
    /// `UpstreamUnreachable`. No retry, and never a silent fallback to a mock:
    /// upstream health must not influence the mock-vs-proxy decision.
    pub async fn forward(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> EngineResult<ForwardedResponse> {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        let target = format!("{}{}", self.base_url, path_and_query);
        debug!("Forwarding {} {} to upstream", method, target);

        let req_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .map_err(|e| EngineError::UpstreamUnreachable(e.to_string()))?;

        let mut request = self.client.request(req_method, &target).body(body);
        for (name, value) in headers {
            let lower = name.as_str().to_ascii_lowercase();
            if lower == "host" || lower == "content-length" || HOP_BY_HOP.contains(&lower.as_str())
            {
                continue;
            }
            request = request.header(name.as_str(), value.as_bytes());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !HOP_BY_HOP.contains(&name.as_str()))
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();
        let body = Bytes::from(response.bytes().await?.to_vec());

        Ok(ForwardedResponse {
            status,
            headers,
            body,
        })
    }
}
