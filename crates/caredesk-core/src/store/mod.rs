//! Client-side persistence for authenticated sessions.
//!
//! - `KeyValueStore`: the injectable string store, with `MemoryStore`,
//!   `FileStore` (a JSON file in the data directory) and `KeyringStore`
//!   (the OS keychain) implementations
//! - `SessionStore`: saves, clears and re-derives sessions on top of a store

pub mod file;
pub mod keychain;
pub mod kv;
pub mod session;

pub use file::FileStore;
pub use keychain::KeyringStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use session::{ClearScope, SessionStore, AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY};
