//! Thin wrapper around `reqwest` that resolves paths against a base
//! endpoint, decodes the body by content type and maps transport failures
//! to [`RequestError`] variants.

use crate::transport::error::RequestError;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// A decoded HTTP response body.
///
/// The split happens once, at the transport boundary: a response whose
/// `Content-Type` contains `json` is parsed into [`ResponseBody::Json`],
/// anything else is returned verbatim as [`ResponseBody::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Returns the decoded JSON value, or `None` for a text body.
    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Issues single HTTP requests against a configured base endpoint.
///
/// When constructed without a shared [`Client`], a transient one is built
/// for each request and dropped when the call returns, on every exit path.
/// A shared client is reused across requests and never dropped here.
pub struct ApiClient {
    endpoint: String,
    http: Option<Client>,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        http: Option<Client>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
            timeout,
        }
    }

    /// Resolves `path` against the base endpoint. A path that already
    /// carries a scheme passes through unchanged.
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Performs exactly one HTTP call and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Timeout`] when the configured deadline
    /// expires, [`RequestError::HttpStatus`] for a non-2xx response,
    /// [`RequestError::Network`] for connection-level failures and
    /// [`RequestError::Decode`] when the body cannot be read. None of
    /// these are retried.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        query: &[(&str, &str)],
    ) -> Result<ResponseBody, RequestError> {
        let url = self.resolve_url(path);
        debug!("Fetch data from {} {}, query {:?}", method, url, query);

        // Keeps a transient client alive for exactly this call.
        let transient;
        let http = match &self.http {
            Some(shared) => shared,
            None => {
                transient = Client::new();
                &transient
            }
        };

        let mut request = http.request(method, url.as_str()).query(query);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RequestError::Timeout(url.clone())
            } else {
                RequestError::Network(url.clone(), e)
            }
        })?;

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!("Error when getting {}: {}", url, e);
                return Err(if let Some(status) = e.status() {
                    RequestError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    RequestError::Network(url, e)
                });
            }
        };

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        if is_json {
            let value: Value = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    RequestError::Timeout(url.clone())
                } else {
                    RequestError::Decode(url.clone(), e)
                }
            })?;
            debug!("Data fetched from {}: {}", url, value);
            Ok(ResponseBody::Json(value))
        } else {
            let text = response.text().await.map_err(|e| {
                if e.is_timeout() {
                    RequestError::Timeout(url.clone())
                } else {
                    RequestError::Decode(url.clone(), e)
                }
            })?;
            debug!("Data fetched from {}: {:?}", url, text);
            Ok(ResponseBody::Text(text))
        }
    }
}
