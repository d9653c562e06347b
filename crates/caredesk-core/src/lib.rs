//! Core library for the caredesk operations console.
//!
//! - `api`: HTTP client for login, signup and logout
//! - `auth`: the authentication state machine and flow controller
//! - `store`: key-value backends and the session store built on them
//! - `models`: sessions, principals and the dashboard records
//! - `config`: persisted settings and navigation routes
//! - `utils`: presentation helpers (dates, initials, phone numbers)

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiError, AuthBackend, AuthClient};
pub use auth::{AuthController, AuthStatus, Navigation, SubmitOutcome};
pub use config::{Config, Routes, StorageBackend};
pub use store::{FileStore, KeyValueStore, KeyringStore, MemoryStore, SessionStore};
