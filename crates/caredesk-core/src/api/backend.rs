use async_trait::async_trait;

use crate::models::{Credentials, PrincipalKind, Session, SignupPayload};

use super::ApiError;

/// The outbound calls the auth flow depends on.
///
/// `AuthClient` talks to the real API; tests substitute in-process fakes.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(
        &self,
        kind: PrincipalKind,
        credentials: &Credentials,
    ) -> Result<Session, ApiError>;

    async fn signup(
        &self,
        kind: PrincipalKind,
        payload: &SignupPayload,
    ) -> Result<Session, ApiError>;

    /// End the server-side session. `token` is the stored bearer, if any.
    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError>;
}
