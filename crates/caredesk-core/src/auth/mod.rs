//! Authentication flow.
//!
//! This module provides:
//! - `AuthStatus`: the Idle → Submitting → Succeeded | Failed state machine
//!   with pure transitions
//! - `AuthController`: runs one request at a time against an `AuthBackend`,
//!   persists the resulting session and returns navigation signals

pub mod controller;
pub mod state;

pub use controller::{AuthController, AuthRequest, Navigation, RestoredSession, SubmitOutcome};
pub use state::{AuthEvent, AuthPhase, AuthStatus};
