//! Error types for the chathook core library.
//!
//! Each subsystem has its own error type derived with `thiserror`. All
//! delivery failures surface through the single [`NotificationError`]
//! returned by `send`.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Notification errors
// ---------------------------------------------------------------------------

/// Errors from building and delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The accumulated document failed pre-send validation. Carries every
    /// violation in check order; no network call was made.
    #[error("notification failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// HTTP-level transport error (connect, TLS, timeout).
    #[error("notification HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook endpoint answered with something other than the
    /// dialect's success status code.
    #[error("webhook returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl NotificationError {
    /// The ordered violation list, when this is a validation failure.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A required environment variable is not set.
    #[error("required environment variable '{var}' is not set (referenced by config field '{field}')")]
    EnvVarMissing { var: String, field: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = NotificationError::Invalid(vec![
            "body is a required property.".into(),
            "color must be one of: yellow, green, red, purple, gray, random.".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "notification failed validation: body is a required property.; \
             color must be one of: yellow, green, red, purple, gray, random."
        );

        let err = NotificationError::UnexpectedStatus {
            status: 400,
            body: "bad request".into(),
        };
        assert_eq!(err.to_string(), "webhook returned HTTP 400: bad request");

        let err = ConfigError::EnvVarMissing {
            var: "ROOM_TOKEN".into(),
            field: "room.token_env".into(),
        };
        assert!(err.to_string().contains("ROOM_TOKEN"));
        assert!(err.to_string().contains("room.token_env"));
    }

    #[test]
    fn test_violations_accessor() {
        let err = NotificationError::Invalid(vec!["body is a required property.".into()]);
        assert_eq!(err.violations().map(<[String]>::len), Some(1));

        let err = NotificationError::UnexpectedStatus {
            status: 500,
            body: String::new(),
        };
        assert!(err.violations().is_none());
    }
}
