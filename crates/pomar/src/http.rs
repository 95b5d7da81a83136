//! HTTP client for API suites.
//!
//! A thin layer over `reqwest` that resolves paths against a base URL,
//! injects default headers (bearer or cookie token auth) and keeps the
//! whole response so scenarios can assert on status and body separately.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::result::{PomarError, PomarResult};

/// Default request timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON API client with default headers
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    headers: Vec<(String, String)>,
}

impl ApiClient {
    /// Client for `base_url` with the default timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(base_url, client)
    }

    /// Client around a preconfigured `reqwest::Client`
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            headers: vec![("Accept".to_string(), "application/json".to_string())],
        }
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Authenticate with `Authorization: Bearer <token>`
    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Authenticate with `Cookie: token=<token>`
    #[must_use]
    pub fn with_cookie_token(self, token: &str) -> Self {
        self.with_header("Cookie", format!("token={token}"))
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default headers
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Absolute URL for `path`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> PomarResult<ApiResponse> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let elapsed = start.elapsed();
        tracing::debug!(%method, %url, status, elapsed_ms = elapsed.as_millis() as u64, "http");

        Ok(ApiResponse {
            method: method.to_string(),
            url,
            status,
            body,
            elapsed,
        })
    }

    /// `GET path`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Http`] on transport failure. Error statuses are
    /// not errors; check them with [`ApiResponse::expect_status`].
    pub async fn get(&self, path: &str) -> PomarResult<ApiResponse> {
        self.send(reqwest::Method::GET, path, None).await
    }

    /// `DELETE path`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Http`] on transport failure.
    pub async fn delete(&self, path: &str) -> PomarResult<ApiResponse> {
        self.send(reqwest::Method::DELETE, path, None).await
    }

    /// `POST path` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if the body does not serialize and
    /// [`PomarError::Http`] on transport failure.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PomarResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(reqwest::Method::POST, path, Some(body)).await
    }

    /// `PUT path` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if the body does not serialize and
    /// [`PomarError::Http`] on transport failure.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PomarResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(reqwest::Method::PUT, path, Some(body)).await
    }

    /// `PATCH path` with a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if the body does not serialize and
    /// [`PomarError::Http`] on transport failure.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> PomarResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(reqwest::Method::PATCH, path, Some(body)).await
    }
}

/// A complete HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Request method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Status code
    pub status: u16,
    /// Raw body
    pub body: String,
    /// Round-trip time
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body as text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Body deserialized into `T`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if the body does not fit `T`.
    pub fn json<T: DeserializeOwned>(&self) -> PomarResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Body as an untyped JSON value
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if the body is not JSON.
    pub fn json_value(&self) -> PomarResult<Value> {
        self.json()
    }

    /// Fail unless the status is `expected`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::UnexpectedStatus`] carrying the body.
    pub fn expect_status(&self, expected: u16) -> PomarResult<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(PomarError::UnexpectedStatus {
                method: self.method.clone(),
                url: self.url.clone(),
                expected,
                actual: self.status,
                body: self.body.clone(),
            })
        }
    }
}
