use crate::models::PrincipalKind;

/// Where an authentication attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Idle,
    Submitting,
    Succeeded(PrincipalKind),
    Failed,
}

/// Inputs that move the auth state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A login or signup request is about to be sent
    Submit,
    Succeeded(PrincipalKind),
    /// The request failed; carries the user-facing message
    Failed(String),
    /// A logout happened while the request was in flight; its result was dropped
    Superseded,
    /// The remote logout call failed; the local session is cleared anyway
    LogoutFailed(String),
    LoggedOut,
    /// The view consumed the last outcome
    Acknowledge,
}

/// UI-visible state of the auth flow.
///
/// Transitions are pure: `apply` returns the next status, or `None` when the
/// event is not accepted in the current phase (e.g. a second `Submit` while
/// one is in flight).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    phase: AuthPhase,
    error: Option<String>,
}

impl Default for AuthStatus {
    fn default() -> Self {
        Self::idle()
    }
}

impl AuthStatus {
    pub fn idle() -> Self {
        Self {
            phase: AuthPhase::Idle,
            error: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// Message from the last failure, if the flow is showing one
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Submitting
    }

    pub fn apply(&self, event: AuthEvent) -> Option<AuthStatus> {
        use AuthPhase::*;

        let next = match (self.phase, event) {
            (Submitting, AuthEvent::Submit) => return None,
            (_, AuthEvent::Submit) => AuthStatus {
                phase: Submitting,
                error: None,
            },
            (Submitting, AuthEvent::Succeeded(kind)) => AuthStatus {
                phase: Succeeded(kind),
                error: None,
            },
            (Submitting, AuthEvent::Failed(message)) => AuthStatus {
                phase: Failed,
                error: Some(message),
            },
            (Submitting, AuthEvent::Superseded) => AuthStatus::idle(),
            (_, AuthEvent::Succeeded(_) | AuthEvent::Failed(_) | AuthEvent::Superseded) => {
                return None;
            }
            // Logout never interrupts an in-flight request
            (Submitting, AuthEvent::LogoutFailed(_) | AuthEvent::LoggedOut) => return None,
            (_, AuthEvent::LogoutFailed(message)) => AuthStatus {
                phase: Failed,
                error: Some(message),
            },
            (_, AuthEvent::LoggedOut) => AuthStatus::idle(),
            (Submitting, AuthEvent::Acknowledge) => return None,
            (_, AuthEvent::Acknowledge) => AuthStatus::idle(),
        };

        Some(next)
    }
}
