//! Error types for the admin API client

use thiserror::Error;

/// Result type alias for admin API operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the admin API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (connection, DNS, body read)
    #[error("Request to {path} failed: {message}")]
    Transport {
        /// Request path
        path: String,
        /// Error message
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("Admin API returned status {status}: {}", .messages.join("; "))]
    Api {
        /// HTTP status code
        status: u16,
        /// Messages from the response body, possibly empty
        messages: Vec<String>,
    },

    /// The response body could not be decoded into the expected records
    #[error("Failed to decode response from {path}: {message}")]
    Decode {
        /// Request path
        path: String,
        /// Error message
        message: String,
    },

    /// A list endpoint returned something other than a list
    #[error("Unexpected data structure received from {path}")]
    UnexpectedShape {
        /// Request path
        path: String,
    },

    /// The client could not be built or a request could not be assembled
    #[error("Invalid client configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl ClientError {
    /// Create a transport error for a path
    pub fn transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a path
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// HTTP status, when the server answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server reported that the record does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Messages the server gave for a rejected request
    #[must_use]
    pub fn server_messages(&self) -> &[String] {
        match self {
            Self::Api { messages, .. } => messages,
            _ => &[],
        }
    }
}

/// Extract the `message` field of an error body
///
/// A string becomes one entry, an array of strings becomes many, anything else
/// (including a missing field) yields nothing.
#[must_use]
pub fn messages_from_body(body: &serde_json::Value) -> Vec<String> {
    match body.get("message") {
        Some(serde_json::Value::String(message)) => vec![message.clone()],
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_not_found_detection() {
        let missing = ClientError::Api {
            status: 404,
            messages: vec!["Booking not found".to_string()],
        };
        let broken = ClientError::Api {
            status: 500,
            messages: Vec::new(),
        };

        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
        assert!(!ClientError::transport("/admin/date/1", "refused").is_not_found());
        assert_eq!(broken.status(), Some(500));
    }

    #[test]
    fn test_api_error_display_joins_messages() {
        let error = ClientError::Api {
            status: 422,
            messages: vec!["name is required".to_string(), "about is required".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "Admin API returned status 422: name is required; about is required"
        );
        assert_eq!(error.server_messages().len(), 2);
    }

    #[test]
    fn test_messages_from_body() {
        assert_eq!(
            messages_from_body(&json!({"message": "Invalid rating"})),
            vec!["Invalid rating".to_string()]
        );
        assert_eq!(
            messages_from_body(&json!({"message": ["a", "b"]})),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(messages_from_body(&json!({"error": "nope"})).is_empty());
        assert!(messages_from_body(&json!("plain")).is_empty());
    }

    #[test]
    fn test_non_api_errors_have_no_server_messages() {
        let error = ClientError::UnexpectedShape {
            path: "/admin/date/pending".to_string(),
        };

        assert!(error.server_messages().is_empty());
        assert_eq!(error.status(), None);
    }
}
