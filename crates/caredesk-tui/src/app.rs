//! Application state management for caredesk.
//!
//! This module contains the core `App` struct: which screen is showing, the
//! sign-in form, the dashboard collections, and the channel that brings
//! results back from authentication tasks running in the background.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use caredesk_core::auth::{AuthController, AuthRequest, Navigation, SubmitOutcome};
use caredesk_core::models::{
    sample, Prescription, PrescriptionStats, Principal, PrincipalKind, TeamMember, TeamStats,
};
use caredesk_core::{
    AuthClient, AuthStatus, Config, FileStore, KeyValueStore, KeyringStore, StorageBackend,
};

use crate::form::AuthForm;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Only one auth request and one logout can be outstanding at a time.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Overrides the API base URL from config
const API_URL_ENV: &str = "CAREDESK_API_URL";

/// Pre-fills the email field
const EMAIL_ENV: &str = "CAREDESK_EMAIL";

/// Pre-fills the password field
const PASSWORD_ENV: &str = "CAREDESK_PASSWORD";

/// The controller as wired up by the binary
pub type Controller = AuthController<AuthClient, Box<dyn KeyValueStore>>;

/// Build the auth controller from config: HTTP client plus the configured
/// session storage backend.
pub fn build_controller(config: &Config) -> Result<Controller> {
    let effective = with_api_url_override(config, std::env::var(API_URL_ENV).ok());
    let client = AuthClient::from_config(&effective).context("Failed to build HTTP client")?;

    let store: Box<dyn KeyValueStore> = match config.storage {
        StorageBackend::File => Box::new(FileStore::new(config.data_dir()?)),
        StorageBackend::Keyring => Box::new(KeyringStore::new()),
    };
    debug!(base_url = client.base_url(), storage = ?config.storage, "Controller configured");

    Ok(AuthController::new(client, store, config.routes.clone()))
}

/// Config as used for this run. The override is never written back.
fn with_api_url_override(config: &Config, api_url: Option<String>) -> Config {
    let mut effective = config.clone();
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        effective.api_url = Some(url);
    }
    effective
}

/// Sign-in form values supplied from outside the config file
#[derive(Debug, Clone, Default)]
pub struct Prefill {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Prefill {
    /// Read `CAREDESK_EMAIL` and `CAREDESK_PASSWORD`
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            email: var(EMAIL_ENV),
            password: var(PASSWORD_ENV),
        }
    }
}

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level view, selected by navigation signals from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Prescriptions,
    Team,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Prescriptions => "Prescriptions",
            Tab::Team => "Team",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Prescriptions => Tab::Team,
            Tab::Team => Tab::Prescriptions,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        // Two tabs: previous and next coincide
        self.next()
    }
}

/// Overlay state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingLogout,
    ConfirmingQuit,
    Quitting,
}

/// Who is signed in, for the title bar
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub kind: PrincipalKind,
    /// Missing when the session could not be read back from storage
    pub principal: Option<Principal>,
}

impl SignedIn {
    pub fn display_name(&self) -> &str {
        self.principal
            .as_ref()
            .map(|p| p.display_name.as_str())
            .unwrap_or_else(|| self.kind.label())
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned controller calls
#[derive(Debug)]
enum AuthResult {
    /// A login or signup finished
    Submitted {
        kind: PrincipalKind,
        identifier: String,
        outcome: Result<SubmitOutcome, String>,
    },
    /// Logout finished; the local session is gone either way
    LoggedOut(Navigation),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub controller: Arc<Controller>,

    pub screen: Screen,
    pub state: AppState,
    pub current_tab: Tab,

    pub form: AuthForm,
    /// Snapshot of the controller status, refreshed every tick
    pub auth_status: AuthStatus,
    /// A submit task has been spawned and has not reported back
    submission_pending: bool,
    logout_pending: bool,
    pub signed_in: Option<SignedIn>,

    pub prescriptions: Vec<Prescription>,
    pub prescription_stats: PrescriptionStats,
    pub prescription_selection: usize,
    pub team: Vec<TeamMember>,
    pub team_stats: TeamStats,
    pub team_selection: usize,

    pub status_message: Option<String>,

    auth_tx: mpsc::Sender<AuthResult>,
    auth_rx: mpsc::Receiver<AuthResult>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let controller = Arc::new(build_controller(&config)?);
        Ok(Self::with_controller(config, controller, Prefill::from_env()))
    }

    pub fn with_controller(
        config: Config,
        controller: Arc<Controller>,
        prefill: Prefill,
    ) -> Self {
        let (auth_tx, auth_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let email = prefill
            .email
            .or_else(|| config.last_identifier.clone())
            .unwrap_or_default();
        let password = prefill.password.unwrap_or_default();
        let kind = config.last_kind.unwrap_or(PrincipalKind::User);

        let prescriptions = sample::prescriptions();
        let team = sample::team_members();

        Self {
            prescription_stats: PrescriptionStats::from_records(&prescriptions),
            team_stats: TeamStats::from_members(&team),
            prescriptions,
            team,
            prescription_selection: 0,
            team_selection: 0,

            auth_status: controller.status(),
            controller,
            config,

            screen: Screen::Auth,
            state: AppState::Normal,
            current_tab: Tab::Prescriptions,

            form: AuthForm::new(email, password, kind),
            submission_pending: false,
            logout_pending: false,
            signed_in: None,

            status_message: None,
            auth_tx,
            auth_rx,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Skip the sign-in screen when a stored session exists
    pub fn restore_session(&mut self) {
        if let Some(restored) = self.controller.restore() {
            info!(kind = %restored.kind, "Resuming stored session");
            self.navigate(&restored.navigation);
        }
    }

    /// True while a request is in flight; the submit control is inert
    pub fn is_busy(&self) -> bool {
        self.submission_pending || self.auth_status.is_loading()
    }

    pub fn is_signing_out(&self) -> bool {
        self.logout_pending
    }

    /// Validate the form and hand the request to the controller on a
    /// background task.
    pub fn submit_form(&mut self) {
        if self.is_busy() {
            debug!("Submit ignored, request already in flight");
            return;
        }

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(message) => {
                self.form.validation_error = Some(message);
                return;
            }
        };
        self.form.validation_error = None;
        self.status_message = None;

        let kind = self.form.kind;
        let identifier = self.form.email.trim().to_string();
        self.submission_pending = true;

        let controller = Arc::clone(&self.controller);
        let tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let outcome = match request {
                AuthRequest::Login(credentials) => controller.login(kind, credentials).await,
                AuthRequest::Signup(payload) => controller.signup(kind, payload).await,
            }
            .map_err(|e| e.user_message());

            let _ = tx
                .send(AuthResult::Submitted {
                    kind,
                    identifier,
                    outcome,
                })
                .await;
        });
    }

    /// Sign out on a background task. The view returns to the sign-in form
    /// when the controller reports back.
    pub fn request_logout(&mut self) {
        if self.logout_pending {
            return;
        }
        self.logout_pending = true;
        self.status_message = Some("Signing out...".to_string());

        let controller = Arc::clone(&self.controller);
        let tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let navigation = controller.logout().await;
            let _ = tx.send(AuthResult::LoggedOut(navigation)).await;
        });
    }

    /// Drain finished background work and refresh the status snapshot
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.auth_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_auth_result(result);
        }

        self.auth_status = self.controller.status();
    }

    fn process_auth_result(&mut self, result: AuthResult) {
        match result {
            AuthResult::Submitted {
                kind,
                identifier,
                outcome,
            } => {
                self.submission_pending = false;
                match outcome {
                    Ok(SubmitOutcome::Navigate(navigation)) => {
                        self.form.clear_secret();
                        self.config.remember(&identifier, kind);
                        if let Err(e) = self.config.save() {
                            warn!(error = %e, "Failed to save config");
                        }
                        self.navigate(&navigation);
                    }
                    Ok(SubmitOutcome::Busy) => {
                        debug!("Controller reported a request already in flight");
                    }
                    Ok(SubmitOutcome::Discarded) => {
                        debug!(%kind, "Sign-in finished after a logout and was dropped");
                    }
                    Err(message) => {
                        // The controller keeps the message in its status for the alert
                        debug!(%kind, %message, "Sign-in rejected");
                    }
                }
            }
            AuthResult::LoggedOut(navigation) => {
                self.logout_pending = false;
                let remote_error = self.controller.status().error().map(str::to_string);
                self.controller.acknowledge();
                self.status_message = Some(match remote_error {
                    Some(message) => format!("Signed out on this device. Server said: {}", message),
                    None => "Signed out".to_string(),
                });
                self.navigate(&navigation);
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Follow a navigation signal from the controller
    pub fn navigate(&mut self, navigation: &Navigation) {
        let controller = Arc::clone(&self.controller);
        let routes = controller.routes();
        let route = navigation.route.as_str();

        if route == routes.login {
            self.show_sign_in();
        } else if route == routes.admin_dashboard {
            self.enter_dashboard(PrincipalKind::Admin);
        } else if route == routes.user_dashboard {
            self.enter_dashboard(PrincipalKind::User);
        } else {
            warn!(route, "Navigation to unknown route");
        }
    }

    fn show_sign_in(&mut self) {
        self.screen = Screen::Auth;
        self.state = AppState::Normal;
        self.signed_in = None;
        self.form.clear_secret();
        self.form.validation_error = None;
    }

    fn enter_dashboard(&mut self, kind: PrincipalKind) {
        let principal = match self.controller.sessions().load(kind) {
            Ok(session) => session.map(|s| s.principal),
            Err(e) => {
                warn!(%kind, error = %e, "Could not read signed-in profile");
                None
            }
        };

        self.signed_in = Some(SignedIn { kind, principal });
        self.controller.acknowledge();
        self.screen = Screen::Dashboard;
        self.state = AppState::Normal;
        self.current_tab = Tab::Prescriptions;
        self.prescription_selection = 0;
        self.team_selection = 0;
    }

    // =========================================================================
    // Dashboard selection
    // =========================================================================

    fn current_len(&self) -> usize {
        match self.current_tab {
            Tab::Prescriptions => self.prescriptions.len(),
            Tab::Team => self.team.len(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.current_tab {
            Tab::Prescriptions => &mut self.prescription_selection,
            Tab::Team => &mut self.team_selection,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let max = len - 1;
        let selection = self.selection_mut();
        *selection = if delta.is_negative() {
            selection.saturating_sub(delta.unsigned_abs())
        } else {
            (*selection + delta as usize).min(max)
        };
    }

    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    pub fn select_last(&mut self) {
        let last = self.current_len().saturating_sub(1);
        *self.selection_mut() = last;
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use caredesk_core::MemoryStore;

    use super::test_support::{offline_app, offline_controller, signed_in_app, stored_session};
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Prescriptions.next(), Tab::Team);
        assert_eq!(Tab::Team.next(), Tab::Prescriptions);
        assert_eq!(Tab::Team.prev(), Tab::Prescriptions);
    }

    #[tokio::test]
    async fn test_starts_on_sign_in() {
        let app = offline_app();
        assert_eq!(app.screen, Screen::Auth);
        assert!(!app.is_busy());
        assert!(app.signed_in.is_none());
    }

    #[tokio::test]
    async fn test_restore_goes_to_admin_dashboard() {
        let app = signed_in_app(PrincipalKind::Admin, "Jane");

        assert_eq!(app.screen, Screen::Dashboard);
        let signed_in = app.signed_in.as_ref().unwrap();
        assert_eq!(signed_in.kind, PrincipalKind::Admin);
        assert_eq!(signed_in.display_name(), "Jane");
    }

    #[tokio::test]
    async fn test_prefill_overrides_remembered_email() {
        let config = Config {
            last_identifier: Some("nurse@clinic.test".to_string()),
            ..Config::default()
        };

        let controller = offline_controller(MemoryStore::new());
        let app = App::with_controller(config.clone(), controller, Prefill::default());
        assert_eq!(app.form.email, "nurse@clinic.test");
        assert!(app.form.password.is_empty());

        let prefill = Prefill {
            email: Some("admin@clinic.test".to_string()),
            password: Some("pw".to_string()),
        };
        let controller = offline_controller(MemoryStore::new());
        let app = App::with_controller(config, controller, prefill);
        assert_eq!(app.form.email, "admin@clinic.test");
        assert_eq!(app.form.password, "pw");
    }

    #[test]
    fn test_api_url_override_is_not_persisted() {
        let config = Config::default();

        let effective = with_api_url_override(&config, Some("https://api.test/v1".to_string()));
        assert_eq!(effective.api_base_url(), "https://api.test/v1");
        assert_eq!(config.api_url, None);

        let blank = with_api_url_override(&config, Some("  ".to_string()));
        assert_eq!(blank.api_base_url(), config.api_base_url());
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let mut app = offline_app();
        app.form.password.clear();
        app.submit_form();

        assert!(!app.is_busy());
        assert_eq!(app.form.validation_error.as_deref(), Some("Password is required"));
    }

    #[tokio::test]
    async fn test_unknown_route_keeps_screen() {
        let mut app = offline_app();
        app.navigate(&Navigation::to("/nowhere"));
        assert_eq!(app.screen, Screen::Auth);
    }

    #[tokio::test]
    async fn test_selection_is_clamped() {
        let mut app = offline_app();
        app.move_selection(-1);
        assert_eq!(app.prescription_selection, 0);

        app.move_selection(PAGE_SCROLL_SIZE as isize * 10);
        assert_eq!(app.prescription_selection, app.prescriptions.len() - 1);

        app.current_tab = Tab::Team;
        app.select_last();
        assert_eq!(app.team_selection, app.team.len() - 1);
        app.select_first();
        assert_eq!(app.team_selection, 0);
        assert_eq!(app.prescription_selection, app.prescriptions.len() - 1);
    }

    #[tokio::test]
    async fn test_failed_submit_clears_pending_and_keeps_message() {
        let mut app = offline_app();
        app.form.email = "nurse@clinic.test".to_string();
        app.form.password = "secret".to_string();
        app.submit_form();
        assert!(app.is_busy());

        for _ in 0..100 {
            app.check_background_tasks();
            if !app.is_busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert!(!app.is_busy());
        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(
            app.auth_status.error(),
            Some(caredesk_core::api::FALLBACK_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_logout_returns_to_sign_in_even_when_offline() {
        let store = MemoryStore::new();
        let controller = offline_controller(store.clone());
        controller
            .sessions()
            .save(PrincipalKind::User, &stored_session("Sam"))
            .unwrap();

        let mut app = App::with_controller(Config::default(), controller, Prefill::default());
        app.restore_session();
        assert_eq!(app.screen, Screen::Dashboard);

        app.request_logout();
        assert!(app.is_signing_out());

        for _ in 0..100 {
            app.check_background_tasks();
            if !app.is_signing_out() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(app.screen, Screen::Auth);
        assert!(store.is_empty());
        assert!(app
            .status_message
            .as_deref()
            .unwrap_or_default()
            .starts_with("Signed out"));
        // The logout failure is not shown as a sign-in alert
        assert_eq!(app.auth_status.error(), None);
    }
}
