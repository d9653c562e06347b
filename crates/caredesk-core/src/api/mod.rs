//! REST client module for the console's authentication API.
//!
//! `AuthClient` issues login, signup and logout calls for ordinary users and
//! administrators. It implements `AuthBackend`, the seam the auth flow
//! controller is written against.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::AuthBackend;
pub use client::AuthClient;
pub use error::{ApiError, FALLBACK_ERROR_MESSAGE};
