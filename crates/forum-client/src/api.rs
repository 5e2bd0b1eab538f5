//! Forum HTTP API client
//!
//! Read-side requests against the forum backend that sit outside the duplex
//! channel, currently just the chat message history.

use reqwest::StatusCode;
use tracing::debug;

use crate::errors::ApiError;
use crate::wire::ChatMessage;

/// Client for the forum's authenticated HTTP API.
pub struct ForumApi {
    http: reqwest::Client,
    base_url: String,
}

impl ForumApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch recent chat messages, newest ordering as the server returns it.
    pub async fn fetch_messages(
        &self,
        token: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let url = format!("{}/api/chat/messages", self.base_url);
        debug!(%url, limit, "fetching message history");

        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkFailure {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<Vec<ChatMessage>>()
                .await
                .map_err(|e| ApiError::ServerError {
                    reason: format!("malformed history response: {}", e),
                })
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ApiError::Unauthorized)
        } else {
            Err(ApiError::ServerError {
                reason: format!("status {}", status),
            })
        }
    }
}
