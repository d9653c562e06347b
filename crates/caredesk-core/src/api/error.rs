use serde::Deserialize;
use thiserror::Error;

/// Shown when neither the server nor the transport explains a failure
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server rejected the request and said why
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - credentials were not accepted")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload fields the API is known to use
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<ErrorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Nested { message: Option<String> },
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull a human-readable message out of an error response body
    pub fn server_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let message = match parsed.error {
            Some(ErrorField::Text(text)) => Some(text),
            Some(ErrorField::Nested { message }) => message,
            None => None,
        };
        parsed
            .message
            .or(message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if let Some(message) = Self::server_message(body) {
            return ApiError::Rejected {
                status: status.as_u16(),
                message,
            };
        }

        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// The one place a failure becomes user-facing text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } => message.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_message_shapes() {
        assert_eq!(
            ApiError::server_message(r#"{"message": "Invalid email or password"}"#).as_deref(),
            Some("Invalid email or password")
        );
        assert_eq!(
            ApiError::server_message(r#"{"error": "Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(
            ApiError::server_message(r#"{"error": {"message": "Account locked"}}"#).as_deref(),
            Some("Account locked")
        );
        assert_eq!(ApiError::server_message(r#"{"message": "  "}"#), None);
        assert_eq!(ApiError::server_message("<html>Bad Gateway</html>"), None);
        assert_eq!(ApiError::server_message(""), None);
    }

    #[test]
    fn test_from_status_prefers_server_message() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message": "Invalid email or password"}"#,
        );
        assert!(matches!(err, ApiError::Rejected { status: 401, .. }));
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_from_status_without_message_falls_back() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, ApiError::ServerError(_)));
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);

        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[test]
    fn test_truncate_body() {
        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated, 800 total bytes"));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }
}
