//! Error handling for the storefront client

use std::fmt;
use thiserror::Error;

/// Unified error type for the storefront client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Reading or writing the persisted token failed
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The server rejected the supplied credentials
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The bearer token was missing, invalid or expired on an authenticated call
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The call needs a session and none exists; nothing was sent
    #[error("Not signed in")]
    NotAuthenticated,

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer from the API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new authentication error
    pub fn authentication<T: fmt::Display>(msg: T) -> Self {
        Error::Authentication(msg.to_string())
    }

    /// Create a new API error for the given status
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Map a non-2xx status and its `detail` message onto the error taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Error::Unauthorized(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// True for failures caused by a missing or rejected session
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::Authentication(_) | Error::Unauthorized(_) | Error::NotAuthenticated
        )
    }

    /// Text suitable for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Authentication(msg) | Error::NotFound(msg) | Error::InvalidInput(msg) => {
                msg.clone()
            }
            Error::Api { message, .. } => message.clone(),
            Error::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
            Error::NotAuthenticated => "Please sign in to continue.".to_string(),
            Error::Http(_) => "Could not reach the store. Please try again.".to_string(),
            Error::Json(_) => "The store sent an unexpected response.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            Error::from_status(401, "Invalid token".into()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            Error::from_status(404, "Product not found".into()),
            Error::NotFound(_)
        ));
        match Error::from_status(400, "Email already registered".into()) {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn user_messages_surface_server_detail() {
        let err = Error::authentication("Invalid email or password");
        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(err.is_auth_failure());
        assert!(!Error::api(500, "boom").is_auth_failure());
        assert_eq!(Error::NotAuthenticated.user_message(), "Please sign in to continue.");
    }
}
