use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of account a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum PrincipalKind {
    User,
    Admin,
}

impl PrincipalKind {
    /// Storage key holding the serialized profile for this kind
    pub fn profile_key(&self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Admin => "adminUser",
        }
    }

    /// Path segment of the endpoint family for this kind
    pub fn endpoint_prefix(&self) -> &'static str {
        match self {
            PrincipalKind::User => "auth",
            PrincipalKind::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrincipalKind::User => "Staff",
            PrincipalKind::Admin => "Administrator",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            PrincipalKind::User => PrincipalKind::Admin,
            PrincipalKind::Admin => PrincipalKind::User,
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::User => write!(f, "user"),
            PrincipalKind::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated identity returned by the API.
///
/// This is the normalized form kept in storage. The API's varying field
/// names are resolved by the auth client before a `Principal` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Principal {
    #[serde(default)]
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Principal {
    pub fn role_display(&self) -> &str {
        self.role.as_deref().unwrap_or("member")
    }
}

/// Credential/profile bundle persisted after a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub principal: Principal,
}

/// Login form input. Lives only for the duration of one submit.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Credentials {
    #[serde(rename = "email")]
    pub identifier: String,
    #[serde(rename = "password")]
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Signup form input.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SignupPayload {
    #[serde(rename = "name")]
    pub full_name: String,
    #[serde(rename = "email")]
    pub identifier: String,
    #[serde(rename = "password")]
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupPayload")
            .field("full_name", &self.full_name)
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keys_are_distinct() {
        assert_eq!(PrincipalKind::User.profile_key(), "user");
        assert_eq!(PrincipalKind::Admin.profile_key(), "adminUser");
    }

    #[test]
    fn test_kind_toggle() {
        assert_eq!(PrincipalKind::User.toggle(), PrincipalKind::Admin);
        assert_eq!(PrincipalKind::Admin.toggle(), PrincipalKind::User);
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_serialize_as_login_body() {
        let creds = Credentials::new("a@b.com", "x");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.com", "password": "x"}));
    }

    #[test]
    fn test_stored_principal_format() {
        let json = r#"{"id": "42", "displayName": "Jane", "role": "admin"}"#;
        let principal: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(principal.id, "42");
        assert_eq!(principal.display_name, "Jane");
        assert_eq!(principal.role_display(), "admin");

        let stored = serde_json::to_value(&principal).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({"id": "42", "displayName": "Jane", "role": "admin"})
        );
    }
}
