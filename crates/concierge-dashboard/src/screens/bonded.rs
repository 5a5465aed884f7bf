//! Bonded matches and the notify action

use crate::context::ScreenContext;
use crate::error::{DashboardError, DashboardResult};
use crate::state::{ActionOutcome, BlockingError, Body, NotificationView, Notifier, Phase};
use concierge_client::NotifyRequest;
use concierge_core::types::{Match, RecordId};
use concierge_core::utils::{avatar_url, format_display_date};
use serde::Serialize;
use tracing::{info, warn};

/// Blocking message when the list cannot be fetched
pub const FETCH_FAILED: &str = "Failed to fetch bonded users";
/// Notice when the notify request fails
pub const NOTIFY_FAILED: &str = "Failed to notify users";
/// Notice when the notify request succeeds
pub const NOTIFIED: &str = "Users notified successfully";
/// Notice when notify succeeded but the list could not be re-read
pub const REFRESH_FAILED: &str = "Failed to refresh bonded users";
/// Empty state
pub const EMPTY_STATE: &str = "No bonded users";

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondedRow {
    /// Match the row addresses
    pub match_id: String,
    /// Avatar URLs, sender first
    pub avatars: [String; 2],
    /// First names, sender first
    pub names: [String; 2],
    /// "created - updated"
    pub dates: String,
    /// "Notify" or "Notified"
    pub action_label: &'static str,
    /// Whether the notify control is enabled
    pub action_enabled: bool,
}

/// Everything the bonded screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondedView {
    /// Whether a request is in flight
    pub loading: bool,
    /// Table or replacement
    pub body: Body<Vec<BondedRow>>,
    /// Transient notice
    pub notification: Option<NotificationView>,
}

/// Bonded matches screen
#[derive(Debug)]
pub struct BondedScreen {
    ctx: ScreenContext,
    phase: Phase,
    loaded: bool,
    matches: Vec<Match>,
    notifier: Notifier,
}

impl BondedScreen {
    /// Create an unmounted screen
    #[must_use]
    pub fn new(ctx: ScreenContext) -> Self {
        let notifier = ctx.notifier();
        Self {
            ctx,
            phase: Phase::Idle,
            loaded: false,
            matches: Vec::new(),
            notifier,
        }
    }

    /// Fetch the list; a failure replaces the screen body
    #[tracing::instrument(skip(self))]
    pub async fn mount(&mut self) {
        self.phase = Phase::Loading;
        match self.ctx.api().list_bonded_matches().await {
            Ok(matches) => {
                info!(count = matches.len(), "bonded matches loaded");
                self.matches = matches;
                self.loaded = true;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch bonded matches");
                self.matches.clear();
                self.loaded = false;
                self.phase = Phase::Failed(BlockingError::new(FETCH_FAILED));
            }
        }
    }

    /// Notify both users of a match, then re-read the list
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownRecord`] if the match is not displayed
    /// and [`DashboardError::ActionDisabled`] if it was already notified.
    /// Neither sends a request.
    #[tracing::instrument(skip(self), fields(match_id = %match_id))]
    pub async fn notify(&mut self, match_id: &RecordId) -> DashboardResult<ActionOutcome> {
        let record = self
            .matches
            .iter()
            .find(|record| &record.id == match_id)
            .ok_or_else(|| DashboardError::UnknownRecord {
                kind: "match",
                id: match_id.to_string(),
            })?;

        if record.notify {
            return Err(DashboardError::ActionDisabled {
                action: "Notify",
                reason: "users were already notified".to_string(),
            });
        }

        let request = NotifyRequest::from(record);
        self.phase = Phase::Loading;

        let outcome = match self.ctx.api().notify_match(&request).await {
            Ok(()) => {
                match self.ctx.api().list_bonded_matches().await {
                    Ok(matches) => {
                        self.matches = matches;
                        self.notifier.success(NOTIFIED);
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to refresh bonded matches");
                        self.notifier.error(REFRESH_FAILED);
                    }
                }
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(error = %e, "notify failed");
                self.notifier.error(NOTIFY_FAILED);
                ActionOutcome::Failed
            }
        };

        self.phase = Phase::Ready;
        Ok(outcome)
    }

    /// Current load phase
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Notice holder, for dismissal
    pub const fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Rows derived from the last successful read
    #[must_use]
    pub fn rows(&self) -> Vec<BondedRow> {
        let avatar_base = &self.ctx.settings().avatar_base_url;
        self.matches
            .iter()
            .map(|record| BondedRow {
                match_id: record.id.to_string(),
                avatars: [
                    avatar_url(avatar_base, &record.user_sent_match.first_name),
                    avatar_url(avatar_base, &record.user_accept_match.first_name),
                ],
                names: [
                    record.user_sent_match.first_name.clone(),
                    record.user_accept_match.first_name.clone(),
                ],
                dates: format!(
                    "{} - {}",
                    format_display_date(&record.created_at),
                    format_display_date(&record.updated_at)
                ),
                action_label: if record.notify { "Notified" } else { "Notify" },
                action_enabled: !record.notify,
            })
            .collect()
    }

    /// Full view model
    #[must_use]
    pub fn view(&self) -> BondedView {
        BondedView {
            loading: self.phase.is_loading(),
            body: Body::for_list(
                &self.phase,
                self.loaded,
                self.rows(),
                self.matches.is_empty(),
                EMPTY_STATE,
            ),
            notification: self.notifier.view(),
        }
    }
}
