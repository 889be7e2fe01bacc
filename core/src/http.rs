//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe a round-trip as plain data. The
//! core builds requests and parses responses; the `Transport` implementation
//! supplied by the host performs the actual I/O. The dataset is read-only,
//! so every request is a body-less `GET`.
//!
//! `RawResponse` is the parsed form handed to the normalizers: status and
//! reason phrase are kept verbatim, `data` is present only for a 200.

use crate::error::ApiError;

/// A `GET` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Non-2xx statuses are data, not errors: the transport must hand them back
/// rather than failing.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, e.g. `Internal Server Error`.
    pub status_message: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status, reason phrase and decoded payload of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse<T> {
    pub status: u16,
    pub status_message: String,
    pub data: Option<T>,
}

impl<T> RawResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            status_message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn failed(status: u16, status_message: impl Into<String>) -> Self {
        Self {
            status,
            status_message: status_message.into(),
            data: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RawResponse<U> {
        RawResponse {
            status: self.status,
            status_message: self.status_message,
            data: self.data.map(f),
        }
    }
}

/// Executes an `HttpRequest` on behalf of the core.
///
/// Implementations return `Err` only when no response was obtained at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}
