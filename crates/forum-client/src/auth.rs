//! Auth endpoint client
//!
//! The authentication service is an external collaborator consumed over a
//! plain request/response contract: credentials out, `{ "token": ... }` back.
//! The [`AuthEndpoint`] trait is the seam that keeps the session store
//! testable without a network.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AuthError;

// ----------------------------------------------------------------------------
// Endpoint Trait
// ----------------------------------------------------------------------------

/// The consumed authentication contract.
///
/// Implementations return the issued session token on success.
#[async_trait]
pub trait AuthEndpoint: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError>;
}

// ----------------------------------------------------------------------------
// Wire Shapes
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

// ----------------------------------------------------------------------------
// HTTP Implementation
// ----------------------------------------------------------------------------

/// Production [`AuthEndpoint`] over HTTP.
pub struct HttpAuthEndpoint {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    async fn token_exchange<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "authentication request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure {
                reason: e.to_string(),
            })?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::ServerError {
                    reason: format!("malformed auth response: {}", e),
                })?;

        match body.token {
            Some(token) if !token.is_empty() => Ok(token),
            // An ok status without a token is a server contract violation
            _ => Err(AuthError::ServerError {
                reason: "auth response missing token".to_string(),
            }),
        }
    }
}

#[async_trait]
impl AuthEndpoint for HttpAuthEndpoint {
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.token_exchange("/api/login", &LoginRequest { username, password })
            .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        self.token_exchange(
            "/api/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }
}

/// Map a non-success status onto the auth error taxonomy.
fn classify_status(status: StatusCode) -> Option<AuthError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Some(AuthError::InvalidCredentials);
    }
    Some(AuthError::ServerError {
        reason: format!("status {}", status),
    })
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

// ----------------------------------------------------------------------------
// Test Support
// ----------------------------------------------------------------------------


// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
