//! View state shared by every screen: load phase, blocking errors, notices

use serde::Serialize;
use std::time::{Duration, Instant};

/// Load phase of a screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not mounted yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Last read succeeded
    Ready,
    /// Initial read failed; the body is replaced by the error
    Failed(BlockingError),
}

impl Phase {
    /// Whether a loading indicator should be shown
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The blocking error, if the screen is in the error state
    #[must_use]
    pub const fn blocking_error(&self) -> Option<&BlockingError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Error that replaces the whole screen body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingError {
    /// Message shown to the admin
    pub message: String,
    /// Whether a "Go Back" control is offered
    pub can_go_back: bool,
}

impl BlockingError {
    /// Blocking error without a way back
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            can_go_back: false,
        }
    }

    /// Blocking error offering "Go Back"
    pub fn with_go_back(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            can_go_back: true,
        }
    }
}

/// Outcome of a user-triggered mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The server accepted the write
    Succeeded,
    /// The server rejected the write or could not be reached; a notice or
    /// form error was raised and displayed data is unchanged
    Failed,
}

impl ActionOutcome {
    /// Whether the write went through
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Positive confirmation
    Success,
    /// Non-blocking failure
    Error,
}

/// Why a notice is being dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Click somewhere outside the notice
    ClickAway,
    /// Explicit close control
    Close,
    /// Auto-hide timer elapsed
    Timeout,
}

/// Transient banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Banner text
    pub message: String,
    /// Banner severity
    pub severity: Severity,
    /// When the banner was raised
    pub raised_at: Instant,
    /// How long it stays up without interaction
    pub auto_hide: Duration,
}

impl Notification {
    /// Whether the auto-hide timer has elapsed at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= self.auto_hide
    }
}

/// Serializable form of a visible notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    /// Banner text
    pub message: String,
    /// Banner severity
    pub severity: Severity,
}

/// Holds at most one transient notice per screen
#[derive(Debug, Clone)]
pub struct Notifier {
    current: Option<Notification>,
    auto_hide: Duration,
}

impl Notifier {
    /// Create a notifier with a fixed auto-hide duration
    #[must_use]
    pub const fn new(auto_hide: Duration) -> Self {
        Self {
            current: None,
            auto_hide,
        }
    }

    /// Raise a notice, replacing any visible one
    pub fn raise(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        tracing::debug!(%message, ?severity, "notification raised");
        self.current = Some(Notification {
            message,
            severity,
            raised_at: Instant::now(),
            auto_hide: self.auto_hide,
        });
    }

    /// Raise a success notice
    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(message, Severity::Success);
    }

    /// Raise an error notice
    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(message, Severity::Error);
    }

    /// Dismiss the notice; click-away is ignored
    ///
    /// Returns whether a notice was hidden.
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        if reason == DismissReason::ClickAway {
            return false;
        }
        self.current.take().is_some()
    }

    /// Hide the notice if its timer elapsed at `now`
    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|notice| notice.is_expired_at(now))
        {
            self.dismiss(DismissReason::Timeout);
        }
    }

    /// The notice, regardless of its timer
    #[must_use]
    pub const fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// The notice if it is still visible at `now`
    #[must_use]
    pub fn visible_at(&self, now: Instant) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notice| !notice.is_expired_at(now))
    }

    /// Serializable view of the notice visible right now
    #[must_use]
    pub fn view(&self) -> Option<NotificationView> {
        self.visible_at(Instant::now())
            .map(|notice| NotificationView {
                message: notice.message.clone(),
                severity: notice.severity,
            })
    }
}

/// What a screen body shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum Body<T> {
    /// Nothing requested yet
    Idle,
    /// First load still in flight
    Loading,
    /// Blocking error replaces the body
    Failed(BlockingError),
    /// Loaded, nothing to show
    Empty(String),
    /// Loaded content
    Ready(T),
}

impl<T> Body<T> {
    /// Build the body for a list screen
    ///
    /// `loaded` is false until the first successful read, so a mutation in
    /// flight keeps showing the previous content.
    pub fn for_list(phase: &Phase, loaded: bool, items: T, is_empty: bool, empty: &str) -> Self {
        match phase {
            Phase::Failed(error) => Self::Failed(error.clone()),
            Phase::Idle => Self::Idle,
            Phase::Loading if !loaded => Self::Loading,
            _ if is_empty => Self::Empty(empty.to_string()),
            _ => Self::Ready(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_click_away_does_not_dismiss() {
        let mut notifier = Notifier::new(Duration::from_secs(6));
        notifier.success("Users notified successfully");

        assert!(!notifier.dismiss(DismissReason::ClickAway));
        assert!(notifier.current().is_some());

        assert!(notifier.dismiss(DismissReason::Close));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_notice_expires_after_auto_hide() {
        let mut notifier = Notifier::new(Duration::from_millis(6000));
        notifier.error("Failed to notify users");
        let raised = notifier.current().map(|n| n.raised_at);

        let Some(raised) = raised else {
            return;
        };
        assert!(notifier.visible_at(raised + Duration::from_millis(5999)).is_some());
        assert!(notifier.visible_at(raised + Duration::from_millis(6000)).is_none());

        notifier.expire(raised + Duration::from_millis(6001));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_raise_replaces_previous_notice() {
        let mut notifier = Notifier::new(Duration::from_secs(6));
        notifier.error("first");
        notifier.success("second");

        let view = notifier.view();
        assert_eq!(
            view,
            Some(NotificationView {
                message: "second".to_string(),
                severity: Severity::Success,
            })
        );
    }

    #[test]
    fn test_body_for_list() {
        let failed = Phase::Failed(BlockingError::new("boom"));
        assert_eq!(
            Body::for_list(&failed, true, (), false, "empty"),
            Body::Failed(BlockingError::new("boom"))
        );
        assert_eq!(Body::for_list(&Phase::Loading, false, (), false, "empty"), Body::Loading);
        assert_eq!(Body::for_list(&Phase::Loading, true, 3, false, "empty"), Body::Ready(3));
        assert_eq!(
            Body::for_list(&Phase::Ready, true, 0, true, "No places yet"),
            Body::Empty("No places yet".to_string())
        );
        assert_eq!(Body::<()>::for_list(&Phase::Idle, false, (), true, "x"), Body::Idle);
    }

    #[test]
    fn test_blocking_error_go_back() {
        assert!(!BlockingError::new("x").can_go_back);
        assert!(BlockingError::with_go_back("x").can_go_back);
        assert!(Phase::Failed(BlockingError::new("x")).blocking_error().is_some());
        assert!(Phase::Loading.is_loading());
    }
}
