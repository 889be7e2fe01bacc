//! Blocking HTTP transport backed by ureq.

use std::time::Duration;

use rickmorty_core::{ApiError, HttpRequest, HttpResponse, Transport};
use tracing::trace;

/// Executes core requests with a shared ureq agent.
///
/// Status-code-as-error is disabled so 4xx/5xx responses come back as data
/// and the core decides what they mean.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        trace!(url = %request.url, status = status.as_u16(), bytes = body.len(), "response read");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_message: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
