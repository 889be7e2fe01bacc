//! Response normalizers: every raw response becomes `{results, error}`.
//!
//! A non-200 status never raises. It degrades to an empty result set plus an
//! `"Unknown Error: <reason phrase>"` message.

use serde::Serialize;
use tracing::warn;

use crate::http::RawResponse;
use crate::types::Page;

/// Uniform outcome of one lookup. Built fresh per call and never mutated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NormalizedResult<T> {
    pub results: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> NormalizedResult<T> {
    pub fn ok(results: Vec<T>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn status_error<T>(status: u16, status_message: &str) -> NormalizedResult<T> {
    warn!(status, status_message, "request returned a non-200 status");
    NormalizedResult::failed(format!("Unknown Error: {status_message}"))
}

/// Keep the page's items and drop its pagination metadata.
pub fn normalize_list<T>(response: RawResponse<Page<T>>) -> NormalizedResult<T> {
    if response.status != 200 {
        return status_error(response.status, &response.status_message);
    }
    NormalizedResult::ok(response.data.map(|page| page.results).unwrap_or_default())
}

/// Accepts either a sequence or a single item and always yields a sequence.
pub fn normalize_item<T, D>(response: RawResponse<D>) -> NormalizedResult<T>
where
    D: Into<Vec<T>>,
{
    if response.status != 200 {
        return status_error(response.status, &response.status_message);
    }
    NormalizedResult::ok(response.data.map(Into::into).unwrap_or_default())
}
