//! HTTP utilities for GCP REST API calls

use crate::error::RemoteError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary so multi-byte text cannot split
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    // Keep log lines single-line
    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Message of a GCP error body (`{"error": {"message": ...}}`), or the status reason
fn api_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new(user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self { client })
    }

    /// Make a GET request to a GCP API and decode the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, RemoteError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        // Read the body before checking status so errors can carry the API message
        let status = response.status();
        let body = response.text().await.map_err(RemoteError::Transport)?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(RemoteError::Api {
                status,
                message: api_error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(RemoteError::Decode)
    }
}
