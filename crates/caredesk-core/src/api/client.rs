//! HTTP client for the console's authentication endpoints.
//!
//! Every call is a single attempt: no retries, and the only timeout is the
//! one configured on the underlying `reqwest::Client`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{Credentials, Principal, PrincipalKind, Session, SignupPayload};

use super::{ApiError, AuthBackend};

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Successful auth body. Both the bare form and the `{success, data}`
/// envelope are accepted and normalized into one `Session`.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    success: Option<bool>,
    message: Option<String>,
    data: Option<AuthPayload>,
    #[serde(flatten)]
    payload: AuthPayload,
}

/// Token and profile fields. Servers disagree on the names and some send
/// more than one spelling at once, so every spelling gets its own field and
/// the first non-empty one wins.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    access_token: Option<String>,
    token: Option<String>,
    access_credential: Option<String>,
    refresh_token: Option<String>,
    refresh_credential: Option<String>,
    user: Option<WirePrincipal>,
    principal: Option<WirePrincipal>,
    admin: Option<WirePrincipal>,
}

/// Profile as the API sends it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePrincipal {
    id: Option<WireId>,
    #[serde(rename = "_id")]
    object_id: Option<WireId>,
    display_name: Option<String>,
    name: Option<String>,
    full_name: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

/// Identifiers arrive as strings or as plain numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(id) => id,
            WireId::Number(id) => id.to_string(),
        }
    }
}

fn first_present(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

impl WirePrincipal {
    fn into_principal(self) -> Result<Principal, ApiError> {
        let id = self
            .id
            .or(self.object_id)
            .map(WireId::into_string)
            .unwrap_or_default();
        let display_name = first_present([self.display_name, self.name, self.full_name])
            .or_else(|| self.email.clone())
            .ok_or_else(|| ApiError::InvalidResponse("User profile has no name".to_string()))?;

        Ok(Principal {
            id,
            display_name,
            email: self.email,
            role: self.role,
        })
    }
}

impl AuthResponse {
    fn into_session(self, status: StatusCode) -> Result<Session, ApiError> {
        if self.success == Some(false) {
            return Err(match self.message {
                Some(message) if !message.trim().is_empty() => ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                _ => ApiError::InvalidResponse(
                    "Request reported failure without a message".to_string(),
                ),
            });
        }

        let payload = self.data.unwrap_or(self.payload);
        let access_token =
            first_present([payload.access_token, payload.token, payload.access_credential])
                .ok_or_else(|| {
                    ApiError::InvalidResponse("Response is missing an access token".to_string())
                })?;
        let principal = payload
            .user
            .or(payload.principal)
            .or(payload.admin)
            .ok_or_else(|| {
                ApiError::InvalidResponse("Response is missing the user profile".to_string())
            })?
            .into_principal()?;

        Ok(Session {
            access_token,
            refresh_token: first_present([payload.refresh_token, payload.refresh_credential]),
            principal,
        })
    }
}

/// API client for the authentication endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, kind: PrincipalKind, action: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.endpoint_prefix(), action)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post_auth<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Session, ApiError> {
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        let status = response.status();

        let text = response.text().await?;
        let parsed: AuthResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse auth response: {}", e))
        })?;

        parsed.into_session(status)
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn login(
        &self,
        kind: PrincipalKind,
        credentials: &Credentials,
    ) -> Result<Session, ApiError> {
        let url = self.endpoint(kind, "login");
        debug!(%kind, url = %url, identifier = %credentials.identifier, "Sending login request");

        let session = self.post_auth(&url, credentials).await?;
        info!(%kind, principal = %session.principal.display_name, "Login accepted");
        Ok(session)
    }

    async fn signup(
        &self,
        kind: PrincipalKind,
        payload: &SignupPayload,
    ) -> Result<Session, ApiError> {
        let url = self.endpoint(kind, "signup");
        debug!(%kind, url = %url, identifier = %payload.identifier, "Sending signup request");

        let session = self.post_auth(&url, payload).await?;
        info!(%kind, principal = %session.principal.display_name, "Signup accepted");
        Ok(session)
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        let url = format!("{}/auth/logout", self.base_url);
        let mut request = self.client.post(&url);
        match token {
            Some(token) => request = request.bearer_auth(token),
            None => warn!("Logging out without a stored token"),
        }

        let response = request.send().await?;
        Self::check_response(response).await?;
        debug!("Logout acknowledged");
        Ok(())
    }
}
