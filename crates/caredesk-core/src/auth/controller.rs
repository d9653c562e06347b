use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, AuthBackend};
use crate::config::Routes;
use crate::models::{Credentials, PrincipalKind, Session, SignupPayload};
use crate::store::{ClearScope, KeyValueStore, SessionStore};

use super::{AuthEvent, AuthStatus};

/// What a submit sends to the API
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Login(Credentials),
    Signup(SignupPayload),
}

impl AuthRequest {
    fn action(&self) -> &'static str {
        match self {
            AuthRequest::Login(_) => "login",
            AuthRequest::Signup(_) => "signup",
        }
    }
}

/// Signal to move the front end to another route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: String,
}

impl Navigation {
    pub fn to(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Authenticated and stored; go to the dashboard
    Navigate(Navigation),
    /// Another request was already in flight, nothing was sent
    Busy,
    /// A logout finished while the request was in flight, so nothing was stored
    Discarded,
}

/// A session found in storage at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredSession {
    pub kind: PrincipalKind,
    pub session: Session,
    pub navigation: Navigation,
}

/// Drives one authentication attempt at a time.
///
/// Methods take `&self` so the controller can be shared behind an `Arc`
/// between the event loop and the task running a request. Neither lock is
/// ever held across an await.
pub struct AuthController<B, S> {
    backend: B,
    sessions: SessionStore<S>,
    routes: Routes,
    status: Mutex<AuthStatus>,
    /// Bumped by each logout together with the clear. A request started
    /// under an older generation never writes its session.
    generation: Mutex<u64>,
}

impl<B: AuthBackend, S: KeyValueStore> AuthController<B, S> {
    pub fn new(backend: B, store: S, routes: Routes) -> Self {
        Self {
            backend,
            sessions: SessionStore::new(store),
            routes,
            status: Mutex::new(AuthStatus::idle()),
            generation: Mutex::new(0),
        }
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    fn lock_status(&self) -> MutexGuard<'_, AuthStatus> {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Save unless a logout has cleared storage since `started`
    fn save_if_current(&self, started: u64, kind: PrincipalKind, session: &Session) -> bool {
        let generation = self.lock_generation();
        if *generation != started {
            return false;
        }
        if let Err(e) = self.sessions.save(kind, session) {
            warn!(%kind, error = %e, "Failed to persist session");
        }
        true
    }

    /// Snapshot for rendering
    pub fn status(&self) -> AuthStatus {
        self.lock_status().clone()
    }

    /// Apply an event if the current phase accepts it
    fn transition(&self, event: AuthEvent) -> bool {
        let mut status = self.lock_status();
        match status.apply(event) {
            Some(next) => {
                *status = next;
                true
            }
            None => false,
        }
    }

    /// Run one login or signup attempt.
    ///
    /// On failure the message is stored in the status before the error is
    /// returned, and nothing is written to storage.
    ///
    /// If a logout clears storage while the request is in flight, the result
    /// is dropped and `Discarded` is returned.
    pub async fn submit(
        &self,
        kind: PrincipalKind,
        request: AuthRequest,
    ) -> Result<SubmitOutcome, ApiError> {
        if !self.transition(AuthEvent::Submit) {
            debug!(
                %kind,
                action = request.action(),
                "Ignoring submit while a request is in flight"
            );
            return Ok(SubmitOutcome::Busy);
        }
        let started = *self.lock_generation();

        let result = match request {
            AuthRequest::Login(ref credentials) => self.backend.login(kind, credentials).await,
            AuthRequest::Signup(ref payload) => self.backend.signup(kind, payload).await,
        };

        match result {
            Ok(session) => {
                if !self.save_if_current(started, kind, &session) {
                    info!(%kind, "Logged out while the request was in flight, session dropped");
                    self.transition(AuthEvent::Superseded);
                    return Ok(SubmitOutcome::Discarded);
                }
                self.transition(AuthEvent::Succeeded(kind));
                info!(%kind, action = request.action(), "Authentication succeeded");
                Ok(SubmitOutcome::Navigate(Navigation::to(
                    self.routes.dashboard_for(kind),
                )))
            }
            Err(e) => {
                error!(%kind, action = request.action(), error = %e, "Authentication failed");
                if *self.lock_generation() == started {
                    self.transition(AuthEvent::Failed(e.user_message()));
                } else {
                    self.transition(AuthEvent::Superseded);
                }
                Err(e)
            }
        }
    }

    pub async fn login(
        &self,
        kind: PrincipalKind,
        credentials: Credentials,
    ) -> Result<SubmitOutcome, ApiError> {
        self.submit(kind, AuthRequest::Login(credentials)).await
    }

    pub async fn signup(
        &self,
        kind: PrincipalKind,
        payload: SignupPayload,
    ) -> Result<SubmitOutcome, ApiError> {
        self.submit(kind, AuthRequest::Signup(payload)).await
    }

    /// End the session. Local state is always cleared, whatever the API says.
    pub async fn logout(&self) -> Navigation {
        let token = match self.sessions.access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read stored token for logout");
                None
            }
        };

        let result = self.backend.logout(token.as_deref()).await;
        {
            let mut generation = self.lock_generation();
            *generation += 1;
            self.sessions.clear(ClearScope::All);
        }

        match result {
            Ok(()) => {
                self.transition(AuthEvent::LoggedOut);
                info!("Logged out");
            }
            Err(e) => {
                warn!(error = %e, "Remote logout failed, local session cleared");
                self.transition(AuthEvent::LogoutFailed(e.user_message()));
            }
        }

        Navigation::to(self.routes.login.as_str())
    }

    /// Consume the last outcome and return to Idle
    pub fn acknowledge(&self) {
        self.transition(AuthEvent::Acknowledge);
    }

    /// Find a stored session, administrator first
    pub fn restore(&self) -> Option<RestoredSession> {
        for kind in [PrincipalKind::Admin, PrincipalKind::User] {
            match self.sessions.load(kind) {
                Ok(Some(session)) => {
                    debug!(%kind, "Restored stored session");
                    return Some(RestoredSession {
                        kind,
                        session,
                        navigation: Navigation::to(self.routes.dashboard_for(kind)),
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(%kind, error = %e, "Failed to read stored session"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::auth::AuthPhase;
    use crate::models::Principal;
    use crate::store::{MemoryStore, AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY};

    enum Outcome {
        Succeed(Session),
        Reject(&'static str),
    }

    struct FakeBackend {
        outcome: Outcome,
        logout_fails: bool,
        gate: Option<Arc<Notify>>,
        logins: AtomicUsize,
        signups: AtomicUsize,
        logouts: AtomicUsize,
    }

    impl FakeBackend {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                logout_fails: false,
                gate: None,
                logins: AtomicUsize::new(0),
                signups: AtomicUsize::new(0),
                logouts: AtomicUsize::new(0),
            }
        }

        async fn respond(&self) -> Result<Session, ApiError> {
            if let Some(ref gate) = self.gate {
                gate.notified().await;
            }
            match self.outcome {
                Outcome::Succeed(ref session) => Ok(session.clone()),
                Outcome::Reject(message) => Err(ApiError::Rejected {
                    status: 401,
                    message: message.to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(
            &self,
            _kind: PrincipalKind,
            _credentials: &Credentials,
        ) -> Result<Session, ApiError> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            self.respond().await
        }

        async fn signup(
            &self,
            _kind: PrincipalKind,
            _payload: &SignupPayload,
        ) -> Result<Session, ApiError> {
            self.signups.fetch_add(1, Ordering::SeqCst);
            self.respond().await
        }

        async fn logout(&self, _token: Option<&str>) -> Result<(), ApiError> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            if self.logout_fails {
                Err(ApiError::Unauthorized)
            } else {
                Ok(())
            }
        }
    }

    fn jane() -> Session {
        Session {
            access_token: "tok1".to_string(),
            refresh_token: None,
            principal: Principal {
                id: String::new(),
                display_name: "Jane".to_string(),
                email: None,
                role: None,
            },
        }
    }

    fn creds() -> Credentials {
        Credentials::new("a@b.com", "x")
    }

    fn controller(
        backend: FakeBackend,
        store: MemoryStore,
    ) -> AuthController<FakeBackend, MemoryStore> {
        AuthController::new(backend, store, Routes::default())
    }

    #[tokio::test]
    async fn test_admin_login_success_stores_session_and_navigates() {
        let store = MemoryStore::new();
        store.set("user", r#"{"id":"u","displayName":"Uma"}"#).unwrap();
        let ctl = controller(FakeBackend::new(Outcome::Succeed(jane())), store.clone());

        let outcome = ctl.login(PrincipalKind::Admin, creds()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Navigate(Navigation::to("/admin/dashboard")));
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok1"));
        assert!(store.get("adminUser").unwrap().unwrap().contains("\"displayName\":\"Jane\""));
        assert_eq!(
            store.get("user").unwrap().as_deref(),
            Some(r#"{"id":"u","displayName":"Uma"}"#)
        );
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);

        let status = ctl.status();
        assert_eq!(status.phase(), AuthPhase::Succeeded(PrincipalKind::Admin));
        assert!(!status.is_loading());
    }

    #[tokio::test]
    async fn test_failed_login_records_message_without_writing() {
        let store = MemoryStore::new();
        let ctl = controller(
            FakeBackend::new(Outcome::Reject("Invalid email or password")),
            store.clone(),
        );

        let err = ctl.login(PrincipalKind::Admin, creds()).await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(store.is_empty());
        let status = ctl.status();
        assert_eq!(status.error(), Some("Invalid email or password"));
        assert!(!status.is_loading());
        assert_eq!(status.phase(), AuthPhase::Failed);
    }

    #[tokio::test]
    async fn test_rapid_submits_send_one_request() {
        let gate = Arc::new(Notify::new());
        let mut backend = FakeBackend::new(Outcome::Succeed(jane()));
        backend.gate = Some(Arc::clone(&gate));
        let ctl = controller(backend, MemoryStore::new());

        let release = async {
            while ctl.backend.logins.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            assert!(ctl.status().is_loading());
            gate.notify_one();
        };

        let (first, second, ()) = tokio::join!(
            ctl.login(PrincipalKind::User, creds()),
            ctl.login(PrincipalKind::User, creds()),
            release,
        );

        assert_eq!(ctl.backend.logins.load(Ordering::SeqCst), 1);
        let outcomes = [first.unwrap(), second.unwrap()];
        assert_eq!(outcomes.iter().filter(|o| **o == SubmitOutcome::Busy).count(), 1);
        assert!(outcomes.contains(&SubmitOutcome::Navigate(Navigation::to("/dashboard"))));
    }

    #[tokio::test]
    async fn test_signup_uses_signup_call() {
        let store = MemoryStore::new();
        let ctl = controller(FakeBackend::new(Outcome::Succeed(jane())), store.clone());
        let payload = SignupPayload {
            full_name: "Jane Roe".to_string(),
            identifier: "a@b.com".to_string(),
            secret: "x".to_string(),
            phone: None,
        };

        let outcome = ctl.signup(PrincipalKind::User, payload).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Navigate(Navigation::to("/dashboard")));
        assert_eq!(ctl.backend.signups.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.backend.logins.load(Ordering::SeqCst), 0);
        assert!(store.get("user").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_allowed() {
        let ctl = controller(
            FakeBackend::new(Outcome::Reject("Invalid email or password")),
            MemoryStore::new(),
        );
        assert!(ctl.login(PrincipalKind::User, creds()).await.is_err());
        assert!(ctl.login(PrincipalKind::User, creds()).await.is_err());
        assert_eq!(ctl.backend.logins.load(Ordering::SeqCst), 2);

        ctl.acknowledge();
        assert_eq!(ctl.status(), AuthStatus::idle());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = MemoryStore::new();
        let ctl = controller(FakeBackend::new(Outcome::Succeed(jane())), store.clone());
        ctl.login(PrincipalKind::Admin, creds()).await.unwrap();
        store.set("user", "{}").unwrap();

        let nav = ctl.logout().await;

        assert_eq!(nav, Navigation::to("/login"));
        for key in [AUTH_TOKEN_KEY, "user", "adminUser"] {
            assert_eq!(store.get(key).unwrap(), None, "{} should be cleared", key);
        }
        assert_eq!(ctl.status(), AuthStatus::idle());
    }

    #[tokio::test]
    async fn test_logout_failure_still_clears_and_redirects() {
        let store = MemoryStore::new();
        let mut backend = FakeBackend::new(Outcome::Succeed(jane()));
        backend.logout_fails = true;
        let ctl = controller(backend, store.clone());
        ctl.login(PrincipalKind::User, creds()).await.unwrap();

        let nav = ctl.logout().await;

        assert_eq!(nav, Navigation::to("/login"));
        assert!(store.is_empty());
        assert_eq!(ctl.backend.logouts.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.status().error(), Some(crate::api::FALLBACK_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_logout_during_login_keeps_storage_clear() {
        let gate = Arc::new(Notify::new());
        let store = MemoryStore::new();
        let mut backend = FakeBackend::new(Outcome::Succeed(jane()));
        backend.gate = Some(Arc::clone(&gate));
        let ctl = controller(backend, store.clone());

        let logout_then_release = async {
            while ctl.backend.logins.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            let nav = ctl.logout().await;
            gate.notify_one();
            nav
        };

        let (outcome, nav) = tokio::join!(
            ctl.login(PrincipalKind::User, creds()),
            logout_then_release,
        );

        assert_eq!(nav, Navigation::to("/login"));
        assert_eq!(outcome.unwrap(), SubmitOutcome::Discarded);
        assert!(store.is_empty());
        assert_eq!(ctl.status(), AuthStatus::idle());

        // A login started after the logout is stored normally
        gate.notify_one();
        ctl.login(PrincipalKind::User, creds()).await.unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok1"));
    }

    #[tokio::test]
    async fn test_restore_prefers_admin() {
        let store = MemoryStore::new();
        let ctl = controller(FakeBackend::new(Outcome::Succeed(jane())), store.clone());
        assert_eq!(ctl.restore(), None);

        ctl.login(PrincipalKind::User, creds()).await.unwrap();
        assert_eq!(ctl.restore().map(|r| r.kind), Some(PrincipalKind::User));

        ctl.login(PrincipalKind::Admin, creds()).await.unwrap();
        let restored = ctl.restore().unwrap();
        assert_eq!(restored.kind, PrincipalKind::Admin);
        assert_eq!(restored.navigation, Navigation::to("/admin/dashboard"));
        assert_eq!(restored.session, jane());
    }
}
