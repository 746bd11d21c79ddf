pub mod gemini;
pub mod image_search;
pub mod youtube;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, header};
use thiserror::Error;

use crate::config::AppConfig;

/// Errors shared by the Google API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(reqwest::Error),
    #[error("api returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
}

// Request URLs carry API keys, so they never reach an error message.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.without_url())
    }
}

impl ApiError {
    pub(crate) fn parse(err: reqwest::Error) -> Self {
        ApiError::Parse(err.without_url().to_string())
    }
}

/// Builds the HTTP client shared by every service client.
pub fn build_client(config: &AppConfig) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(config.user_agent())
            .context("invalid user agent header value")?,
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json, image/*;q=0.9, */*;q=0.5"),
    );

    let http = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("unable to construct http client")?;

    Ok(http)
}

/// Turns a non-2xx response into `ApiError::Api`, keeping Google's error message when present.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message: google_error_message(&body).unwrap_or(body),
    })
}

/// Extracts `error.message` from a Google API error body.
pub(crate) fn google_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) fn unreachable_base_url() -> String {
    // Bind then drop so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind closed port");
    let port = listener.local_addr().expect("closed port addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
