use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::{Principal, PrincipalKind, Session};

use super::KeyValueStore;

/// Bearer token of the most recently saved session
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Refresh token of the most recently saved session, when the API issued one
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Which sessions `SessionStore::clear` removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    Kind(PrincipalKind),
    All,
}

impl From<PrincipalKind> for ClearScope {
    fn from(kind: PrincipalKind) -> Self {
        ClearScope::Kind(kind)
    }
}

/// Persists sessions under principal-kind specific profile keys.
///
/// The credential keys are shared and last-writer-wins; the profile keys
/// (`user`, `adminUser`) let an ordinary and an administrator profile coexist.
pub struct SessionStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Write a freshly authenticated session, replacing any previous one.
    pub fn save(&self, kind: PrincipalKind, session: &Session) -> Result<()> {
        let profile = serde_json::to_string(&session.principal)
            .context("Failed to serialize principal")?;

        self.backend.set(AUTH_TOKEN_KEY, &session.access_token)?;
        match session.refresh_token {
            Some(ref refresh) => self.backend.set(REFRESH_TOKEN_KEY, refresh)?,
            None => self.backend.remove(REFRESH_TOKEN_KEY)?,
        }
        self.backend.set(kind.profile_key(), &profile)?;

        debug!(%kind, principal = %session.principal.display_name, "Session saved");
        Ok(())
    }

    /// Remove stored sessions. Never fails; storage errors are logged.
    pub fn clear(&self, scope: impl Into<ClearScope>) {
        let keys: &[&str] = match scope.into() {
            ClearScope::Kind(PrincipalKind::User) => {
                &[AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, "user"]
            }
            ClearScope::Kind(PrincipalKind::Admin) => {
                &[AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, "adminUser"]
            }
            ClearScope::All => &[AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, "user", "adminUser"],
        };

        for key in keys {
            if let Err(e) = self.backend.remove(key) {
                warn!(key, error = %e, "Failed to remove session key");
            }
        }
        debug!(?keys, "Session keys cleared");
    }

    /// Re-derive a stored session of the given kind.
    ///
    /// Returns `None` unless both the bearer token and the kind's profile are
    /// present. An unreadable profile is logged and treated as absent.
    pub fn load(&self, kind: PrincipalKind) -> Result<Option<Session>> {
        let Some(access_token) = self.backend.get(AUTH_TOKEN_KEY)? else {
            return Ok(None);
        };
        let Some(profile) = self.backend.get(kind.profile_key())? else {
            return Ok(None);
        };

        let principal: Principal = match serde_json::from_str(&profile) {
            Ok(p) => p,
            Err(e) => {
                warn!(%kind, error = %e, "Stored profile could not be parsed");
                return Ok(None);
            }
        };

        Ok(Some(Session {
            access_token,
            refresh_token: self.backend.get(REFRESH_TOKEN_KEY)?,
            principal,
        }))
    }

    /// Bearer token of the current session, if any
    pub fn access_token(&self) -> Result<Option<String>> {
        self.backend.get(AUTH_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session(token: &str, refresh: Option<&str>, name: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: refresh.map(str::to_string),
            principal: Principal {
                id: "1".to_string(),
                display_name: name.to_string(),
                email: None,
                role: None,
            },
        }
    }

    #[test]
    fn test_save_writes_kind_specific_profile() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store
            .save(PrincipalKind::Admin, &session("tok1", Some("ref1"), "Jane"))
            .unwrap();

        assert_eq!(mem.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok1"));
        assert_eq!(mem.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("ref1"));
        assert!(mem.get("adminUser").unwrap().unwrap().contains("Jane"));
        assert_eq!(mem.get("user").unwrap(), None);
    }

    #[test]
    fn test_save_leaves_other_profile_untouched() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store
            .save(PrincipalKind::User, &session("u-tok", None, "Uma"))
            .unwrap();
        let user_profile = mem.get("user").unwrap();

        store
            .save(PrincipalKind::Admin, &session("a-tok", None, "Ada"))
            .unwrap();
        assert_eq!(mem.get("user").unwrap(), user_profile);
        assert_eq!(mem.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("a-tok"));
    }

    #[test]
    fn test_save_without_refresh_drops_stale_refresh() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store
            .save(PrincipalKind::User, &session("t1", Some("r1"), "Uma"))
            .unwrap();
        store
            .save(PrincipalKind::User, &session("t2", None, "Uma"))
            .unwrap();
        assert_eq!(mem.get(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_all_twice() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store
            .save(PrincipalKind::User, &session("t", Some("r"), "Uma"))
            .unwrap();
        store
            .save(PrincipalKind::Admin, &session("t", None, "Ada"))
            .unwrap();

        store.clear(ClearScope::All);
        assert!(mem.is_empty());
        store.clear(ClearScope::All);
        assert!(mem.is_empty());
    }

    #[test]
    fn test_clear_kind_keeps_other_profile() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        store
            .save(PrincipalKind::User, &session("t", None, "Uma"))
            .unwrap();
        store
            .save(PrincipalKind::Admin, &session("t", None, "Ada"))
            .unwrap();

        store.clear(PrincipalKind::Admin);
        assert_eq!(mem.get("adminUser").unwrap(), None);
        assert_eq!(mem.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert!(mem.get("user").unwrap().is_some());
    }

    #[test]
    fn test_load_round_trip_and_missing_pieces() {
        let mem = MemoryStore::new();
        let store = SessionStore::new(mem.clone());
        assert_eq!(store.load(PrincipalKind::User).unwrap(), None);

        let saved = session("tok", Some("ref"), "Uma");
        store.save(PrincipalKind::User, &saved).unwrap();
        assert_eq!(store.load(PrincipalKind::User).unwrap(), Some(saved));
        assert_eq!(store.load(PrincipalKind::Admin).unwrap(), None);

        mem.remove(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(store.load(PrincipalKind::User).unwrap(), None);
    }

    #[test]
    fn test_load_ignores_corrupt_profile() {
        let mem = MemoryStore::new();
        mem.set(AUTH_TOKEN_KEY, "tok").unwrap();
        mem.set("user", "{not json").unwrap();
        let store = SessionStore::new(mem);
        assert_eq!(store.load(PrincipalKind::User).unwrap(), None);
    }
}
