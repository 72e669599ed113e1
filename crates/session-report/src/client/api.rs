//! Coaching backend API client for authenticated requests
//!
//! All requests carry the caller's bearer token. GET requests are retried a
//! bounded number of times when they fail below HTTP (refused connection,
//! timeout); an HTTP error status is returned to the caller as-is.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::token::BearerToken;
use crate::config::Settings;
use crate::error::{ReportError, Result};

/// User agent for backend requests
const API_USER_AGENT: &str = concat!("session-report/", env!("CARGO_PKG_VERSION"));

/// Coaching backend API client
#[derive(Debug, Clone)]
pub struct CoachClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl CoachClient {
    /// Create a client for the backend named in `settings`
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ReportError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            retry_backoff: settings.retry_backoff,
        })
    }

    /// Create a client against a custom base URL with default settings (for testing)
    #[doc(hidden)]
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&Settings::default().with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers with authorization
    fn build_headers(&self, token: &BearerToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        let auth = HeaderValue::from_str(&token.authorization_header())
            .map_err(|_| ReportError::invalid_param("token contains characters not allowed in a header"))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    /// Make an authenticated GET request and return the response
    pub async fn get(&self, token: &BearerToken, path: &str) -> Result<Response> {
        let url = self.build_url(path);
        let headers = self.build_headers(token)?;

        let mut attempt = 0;
        loop {
            debug!(%url, attempt, "GET");
            let err = match self.client.get(&url).headers(headers.clone()).send().await {
                Ok(response) => return self.handle_response_status(response, path).await,
                Err(e) => ReportError::Http(e),
            };
            if !err.is_transient() || attempt >= self.max_retries {
                return Err(err);
            }

            let backoff = self.retry_backoff.saturating_mul(2_u32.saturating_pow(attempt));
            attempt += 1;
            warn!(
                %url,
                error = %err,
                "request failed, retry {}/{} in {:?}",
                attempt,
                self.max_retries,
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    /// Make an authenticated GET request and deserialize JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, token: &BearerToken, path: &str) -> Result<T> {
        let response = self.get(token, path).await?;
        response.json().await.map_err(|e| {
            ReportError::invalid_response(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Make an authenticated GET request and return raw bytes (for file downloads)
    pub async fn download(&self, token: &BearerToken, path: &str) -> Result<Bytes> {
        let response = self.get(token, path).await?;
        response.bytes().await.map_err(ReportError::Http)
    }

    /// Make an authenticated PUT request with a JSON body
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        token: &BearerToken,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let url = self.build_url(path);
        let headers = self.build_headers(token)?;

        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(ReportError::Http)?;

        self.handle_response_status(response, path).await
    }

    /// Upload a file as a multipart form with a single part named `field`
    pub async fn upload(
        &self,
        token: &BearerToken,
        path: &str,
        field: &str,
        file_path: &Path,
    ) -> Result<Response> {
        let url = self.build_url(path);
        let headers = self.build_headers(token)?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let file_bytes = tokio::fs::read(file_path).await?;

        let part = multipart::Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_for(file_path))
            .map_err(|e| ReportError::invalid_param(format!("Invalid MIME type: {}", e)))?;

        let form = multipart::Form::new().part(field.to_string(), part);

        debug!(%url, field, "POST multipart");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(ReportError::Http)?;

        self.handle_response_status(response, path).await
    }

    /// Handle response status codes and convert to errors
    async fn handle_response_status(&self, response: Response, path: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ReportError::NotAuthenticated),
            StatusCode::TOO_MANY_REQUESTS => Err(ReportError::RateLimited),
            StatusCode::NOT_FOUND => Err(ReportError::NotFound(path.to_string())),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ReportError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

/// Content type for an uploaded file, by extension
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
