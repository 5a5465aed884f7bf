//! Error types for dashboard screens

use concierge_client::ClientError;
use thiserror::Error;

/// Result type alias for screen operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Errors a screen action can return to its caller
///
/// Remote failures of mutations are not errors at this level: they are turned
/// into notifications and reported as [`crate::ActionOutcome::Failed`]. These
/// variants cover actions the screen refuses before talking to the server.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Admin API failure surfaced directly
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Core failure (configuration, attachment reads)
    #[error(transparent)]
    Core(#[from] concierge_core::Error),

    /// The control for this action is disabled
    #[error("{action} is disabled: {reason}")]
    ActionDisabled {
        /// Action name
        action: &'static str,
        /// Why it is disabled
        reason: String,
    },

    /// No record with this identifier is displayed
    #[error("No {kind} with id {id} is displayed")]
    UnknownRecord {
        /// Record kind
        kind: &'static str,
        /// Requested identifier
        id: String,
    },

    /// The form this action belongs to is not open
    #[error("The {form} is not open")]
    NoActiveForm {
        /// Form name
        form: &'static str,
    },

    /// The wizard is on a different step
    #[error("The place form is on step {current}, this action needs step {expected}")]
    WrongStep {
        /// Step the action needs
        expected: u8,
        /// Step the wizard is on
        current: u8,
    },

    /// Star ratings go from 1 to 5
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// Banner slots go from 0 to 3
    #[error("Banner slot must be between 0 and 3, got {0}")]
    InvalidSlot(usize),

    /// Required form fields left empty
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A preview job did not finish
    #[error("Preview failed: {0}")]
    Preview(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_message() {
        let error = DashboardError::MissingFields(vec!["name".to_string(), "about".to_string()]);
        assert_eq!(error.to_string(), "Missing required fields: name, about");
    }

    #[test]
    fn test_client_error_is_transparent() {
        let error = DashboardError::from(ClientError::Api {
            status: 404,
            messages: vec!["Booking not found".to_string()],
        });
        assert_eq!(
            error.to_string(),
            "Admin API returned status 404: Booking not found"
        );
    }
}
