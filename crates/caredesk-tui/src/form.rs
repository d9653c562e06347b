//! Login and signup form model.
//!
//! Holds field values and focus, and turns them into an `AuthRequest`.
//! Rendering lives in `ui::forms`; this module has no terminal dependencies.

use caredesk_core::auth::AuthRequest;
use caredesk_core::models::{Credentials, PrincipalKind, SignupPayload};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for the password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the full name input.
const MAX_NAME_LENGTH: usize = 80;

/// Maximum length for the phone input.
const MAX_PHONE_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    Email,
    Password,
    Phone,
    Kind,
    Submit,
    SwitchMode,
}

const LOGIN_FIELDS: &[FormField] = &[
    FormField::Email,
    FormField::Password,
    FormField::Kind,
    FormField::Submit,
    FormField::SwitchMode,
];

const SIGNUP_FIELDS: &[FormField] = &[
    FormField::FullName,
    FormField::Email,
    FormField::Password,
    FormField::Phone,
    FormField::Kind,
    FormField::Submit,
    FormField::SwitchMode,
];

impl FormField {
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::FullName | FormField::Email | FormField::Password | FormField::Phone
        )
    }

    fn max_len(&self) -> usize {
        match self {
            FormField::FullName => MAX_NAME_LENGTH,
            FormField::Email => MAX_EMAIL_LENGTH,
            FormField::Password => MAX_PASSWORD_LENGTH,
            FormField::Phone => MAX_PHONE_LENGTH,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: FormMode,
    pub kind: PrincipalKind,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub focus: FormField,
    /// Missing or malformed input, shown under the fields
    pub validation_error: Option<String>,
}

impl AuthForm {
    pub fn new(email: String, password: String, kind: PrincipalKind) -> Self {
        let focus = if email.is_empty() {
            FormField::Email
        } else {
            FormField::Password
        };
        Self {
            mode: FormMode::Login,
            kind,
            full_name: String::new(),
            email,
            password,
            phone: String::new(),
            focus,
            validation_error: None,
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        match self.mode {
            FormMode::Login => LOGIN_FIELDS,
            FormMode::Signup => SIGNUP_FIELDS,
        }
    }

    fn focus_index(&self) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        self.focus = fields[(self.focus_index() + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let len = fields.len();
        self.focus = fields[(self.focus_index() + len - 1) % len];
    }

    fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::FullName => Some(&mut self.full_name),
            FormField::Email => Some(&mut self.email),
            FormField::Password => Some(&mut self.password),
            FormField::Phone => Some(&mut self.phone),
            _ => None,
        }
    }

    /// Type into the focused field. Returns false if the character was refused.
    pub fn push_char(&mut self, c: char) -> bool {
        let field = self.focus;
        let max_len = field.max_len();
        match self.value_mut(field) {
            Some(value) if can_add_char(value.chars().count(), max_len, c) => {
                value.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn pop_char(&mut self) {
        let field = self.focus;
        if let Some(value) = self.value_mut(field) {
            value.pop();
        }
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
    }

    pub fn switch_mode(&mut self) {
        self.mode = match self.mode {
            FormMode::Login => FormMode::Signup,
            FormMode::Signup => FormMode::Login,
        };
        self.password.clear();
        self.validation_error = None;
        self.focus = self.fields()[0];
    }

    /// Drop the secret once it has been used
    pub fn clear_secret(&mut self) {
        self.password.clear();
    }

    /// Build the request, or explain what is missing.
    pub fn to_request(&self) -> Result<AuthRequest, String> {
        let email = self.email.trim();

        if self.mode == FormMode::Signup && self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !is_email_shaped(email) {
            return Err("Enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }

        let request = match self.mode {
            FormMode::Login => AuthRequest::Login(Credentials::new(email, self.password.as_str())),
            FormMode::Signup => {
                let phone = self.phone.trim();
                AuthRequest::Signup(SignupPayload {
                    full_name: self.full_name.trim().to_string(),
                    identifier: email.to_string(),
                    secret: self.password.clone(),
                    phone: (!phone.is_empty()).then(|| phone.to_string()),
                })
            }
        };
        Ok(request)
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

/// The email field's type hint: `local@domain` with a dot in the domain
pub fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
            .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> AuthForm {
        AuthForm::new(String::new(), String::new(), PrincipalKind::User)
    }

    #[test]
    fn test_initial_focus() {
        assert_eq!(login_form().focus, FormField::Email);
        let prefilled = AuthForm::new("a@b.com".to_string(), String::new(), PrincipalKind::User);
        assert_eq!(prefilled.focus, FormField::Password);
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = login_form();
        form.focus_prev();
        assert_eq!(form.focus, FormField::SwitchMode);
        form.focus_next();
        assert_eq!(form.focus, FormField::Email);
        form.focus_next();
        assert_eq!(form.focus, FormField::Password);
    }

    #[test]
    fn test_typing_only_into_text_fields() {
        let mut form = login_form();
        assert!(form.push_char('a'));
        form.focus = FormField::Submit;
        assert!(!form.push_char('b'));
        form.focus = FormField::Email;
        assert!(!form.push_char('\n'));
        form.pop_char();
        assert_eq!(form.email, "");
    }

    #[test]
    fn test_password_length_limit() {
        let mut form = login_form();
        form.focus = FormField::Password;
        for _ in 0..MAX_PASSWORD_LENGTH {
            assert!(form.push_char('x'));
        }
        assert!(!form.push_char('x'));
    }

    #[test]
    fn test_required_fields() {
        let mut form = login_form();
        assert_eq!(form.to_request().unwrap_err(), "Email is required");
        form.email = "not-an-email".to_string();
        assert_eq!(form.to_request().unwrap_err(), "Enter a valid email address");
        form.email = "a@b.com".to_string();
        assert_eq!(form.to_request().unwrap_err(), "Password is required");
        form.password = "x".to_string();
        match form.to_request().unwrap() {
            AuthRequest::Login(creds) => {
                assert_eq!(creds.identifier, "a@b.com");
                assert_eq!(creds.secret, "x");
            }
            other => panic!("expected login request, got {:?}", other),
        }
    }

    #[test]
    fn test_signup_request() {
        let mut form = login_form();
        form.switch_mode();
        assert_eq!(form.mode, FormMode::Signup);
        assert_eq!(form.focus, FormField::FullName);
        form.email = " a@b.com ".to_string();
        form.password = "x".to_string();
        assert_eq!(form.to_request().unwrap_err(), "Full name is required");

        form.full_name = "Jane Roe".to_string();
        match form.to_request().unwrap() {
            AuthRequest::Signup(payload) => {
                assert_eq!(payload.identifier, "a@b.com");
                assert_eq!(payload.phone, None);
            }
            other => panic!("expected signup request, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_mode_clears_password() {
        let mut form = AuthForm::new(
            "a@b.com".to_string(),
            "secret".to_string(),
            PrincipalKind::Admin,
        );
        form.validation_error = Some("Password is required".to_string());
        form.switch_mode();
        assert!(form.password.is_empty());
        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.kind, PrincipalKind::Admin);
        assert_eq!(form.validation_error, None);
    }

    #[test]
    fn test_is_email_shaped() {
        assert!(is_email_shaped("a@b.com"));
        assert!(is_email_shaped("first.last@clinic.example.org"));
        assert!(!is_email_shaped("a@b"));
        assert!(!is_email_shaped("@b.com"));
        assert!(!is_email_shaped("a@@b.com"));
        assert!(!is_email_shaped("a b@c.com"));
        assert!(!is_email_shaped("a@.com"));
    }
}
