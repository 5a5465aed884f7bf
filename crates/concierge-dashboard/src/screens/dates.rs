//! Pending dates list

use crate::context::ScreenContext;
use crate::state::{BlockingError, Body, Phase};
use concierge_client::ClientError;
use concierge_core::types::Booking;
use concierge_core::utils::{photo_or_placeholder, yes_no};
use serde::Serialize;
use tracing::{info, warn};

/// Blocking message for a failed list read
pub const LOAD_FAILED: &str = "Failed to load pending dates. Please try again.";
/// Blocking message when `data` is not a list
pub const UNEXPECTED_SHAPE: &str = "Unexpected data structure received from the server.";
/// Empty state
pub const EMPTY_STATE: &str = "No pending dates";

/// One pending date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRow {
    /// Booking id, also the detail link
    pub id: String,
    /// Pickup location headline
    pub pick_up_location: String,
    /// Participant names, booker first
    pub names: [String; 2],
    /// Participant photos, placeholder when missing
    pub photos: [String; 2],
    /// "Security details" badge
    pub security: &'static str,
    /// "Logistics" badge
    pub logistics: &'static str,
}

/// Everything the dates screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatesView {
    /// Whether a request is in flight
    pub loading: bool,
    /// List or replacement
    pub body: Body<Vec<DateRow>>,
}

/// Pending dates screen
#[derive(Debug)]
pub struct DatesScreen {
    ctx: ScreenContext,
    phase: Phase,
    loaded: bool,
    bookings: Vec<Booking>,
}

impl DatesScreen {
    /// Create an unmounted screen
    #[must_use]
    pub const fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            phase: Phase::Idle,
            loaded: false,
            bookings: Vec::new(),
        }
    }

    /// Fetch pending bookings
    #[tracing::instrument(skip(self))]
    pub async fn mount(&mut self) {
        self.phase = Phase::Loading;
        match self.ctx.api().list_pending_bookings().await {
            Ok(bookings) => {
                info!(count = bookings.len(), "pending dates loaded");
                self.bookings = bookings;
                self.loaded = true;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to load pending dates");
                let message = match e {
                    ClientError::UnexpectedShape { .. } => UNEXPECTED_SHAPE,
                    _ => LOAD_FAILED,
                };
                self.bookings.clear();
                self.loaded = false;
                self.phase = Phase::Failed(BlockingError::new(message));
            }
        }
    }

    /// Current load phase
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Rows derived from the last successful read
    #[must_use]
    pub fn rows(&self) -> Vec<DateRow> {
        let placeholder = &self.ctx.settings().placeholder_image;
        self.bookings
            .iter()
            .map(|booking| DateRow {
                id: booking.id.to_string(),
                pick_up_location: booking.pick_up_location.clone(),
                names: [
                    booking.booked_by.first_name.clone(),
                    booking.matched_user.first_name.clone(),
                ],
                photos: [
                    photo_or_placeholder(booking.booked_by.photo_url(), placeholder),
                    photo_or_placeholder(booking.matched_user.photo_url(), placeholder),
                ],
                security: yes_no(booking.security_booking_id.is_some()),
                logistics: yes_no(booking.car_booking_id.is_some()),
            })
            .collect()
    }

    /// Full view model
    #[must_use]
    pub fn view(&self) -> DatesView {
        DatesView {
            loading: self.phase.is_loading(),
            body: Body::for_list(
                &self.phase,
                self.loaded,
                self.rows(),
                self.bookings.is_empty(),
                EMPTY_STATE,
            ),
        }
    }
}
