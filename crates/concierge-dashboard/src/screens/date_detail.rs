//! Single date detail, fetched by booking id

use crate::context::ScreenContext;
use crate::state::{BlockingError, Body, Phase};
use concierge_core::types::{BookingDetail, Participant, RecordId};
use concierge_core::utils::{STAR_COUNT, format_server_date, photo_or_placeholder, star_row};
use serde::Serialize;
use tracing::{info, warn};

/// Shown when the server reports the booking does not exist
pub const NOT_FOUND: &str = "Date not found. Please check the ID and try again.";
/// Shown for every other failure
pub const LOAD_FAILED: &str =
    "An error occurred while fetching date details. Please try again later.";

/// Venue card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceCard {
    /// First venue photo or the placeholder
    pub photo: String,
    /// Venue name
    pub name: String,
    /// "city, state"
    pub location: String,
    /// Filled stars
    pub stars: [bool; STAR_COUNT],
}

/// Security escort line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityLine {
    /// "<n> escorts from <organization>"
    pub summary: String,
    /// "Preference: <gender>"
    pub preference: String,
}

/// One participant card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantCard {
    /// First name
    pub name: String,
    /// Photo or the placeholder
    pub photo: String,
    /// Pickup location, first card only
    pub pick_up_location: Option<String>,
    /// "<brand> <category>"
    pub ride: Option<String>,
    /// Escort details
    pub security: Option<SecurityLine>,
    /// Security question, first card only
    pub security_question: Option<String>,
}

/// Loaded detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateDetail {
    /// Booking id
    pub id: String,
    /// `M/D/YYYY`
    pub date: String,
    /// Time as entered
    pub time: String,
    /// Server status label
    pub status: String,
    /// Venue card
    pub place: PlaceCard,
    /// Booker first, matched user second
    pub participants: Vec<ParticipantCard>,
}

/// Everything the detail screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateDetailView {
    /// Whether the fetch is in flight
    pub loading: bool,
    /// Detail or replacement
    pub body: Body<DateDetail>,
}

/// Date detail screen
#[derive(Debug)]
pub struct DateDetailScreen {
    ctx: ScreenContext,
    id: RecordId,
    phase: Phase,
    booking: Option<BookingDetail>,
}

impl DateDetailScreen {
    /// Create an unmounted screen for one booking
    #[must_use]
    pub const fn new(ctx: ScreenContext, id: RecordId) -> Self {
        Self {
            ctx,
            id,
            phase: Phase::Idle,
            booking: None,
        }
    }

    /// Booking this screen shows
    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    /// Fetch the booking; not-found and other failures get distinct messages
    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub async fn mount(&mut self) {
        self.phase = Phase::Loading;
        match self.ctx.api().get_booking(&self.id).await {
            Ok(booking) => {
                info!("date detail loaded");
                self.booking = Some(booking);
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch date detail");
                let message = if e.is_not_found() {
                    NOT_FOUND
                } else {
                    LOAD_FAILED
                };
                self.booking = None;
                self.phase = Phase::Failed(BlockingError::with_go_back(message));
            }
        }
    }

    /// Current load phase
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Detail view model, once loaded
    #[must_use]
    pub fn detail(&self) -> Option<DateDetail> {
        let booking = self.booking.as_ref()?;
        let placeholder = &self.ctx.settings().placeholder_image;
        let place = &booking.place_reservation.place;

        let ride = booking.booked_ride.as_ref().map(|ride| {
            format!(
                "{} {}",
                ride.car_ride.brand.name, ride.car_ride.category.name
            )
        });
        let security = booking.booked_security.as_ref().map(|security| SecurityLine {
            summary: format!(
                "{} escorts from {}",
                security.number_of_escorts, security.security.organization_name
            ),
            preference: format!("Preference: {}", security.gender_preference),
        });

        let card = |participant: &Participant, first: bool| ParticipantCard {
            name: participant.first_name.clone(),
            photo: photo_or_placeholder(participant.photo_url(), placeholder),
            pick_up_location: first.then(|| booking.pick_up_location.clone()),
            ride: ride.clone(),
            security: security.clone(),
            security_question: booking
                .security_question
                .clone()
                .filter(|question| first && !question.is_empty()),
        };

        Some(DateDetail {
            id: booking.id.to_string(),
            date: format_server_date(&booking.scheduled_date),
            time: booking.scheduled_time.clone(),
            status: booking.status.clone(),
            place: PlaceCard {
                photo: photo_or_placeholder(
                    place.place_photos.first().map(|photo| photo.image_url.as_str()),
                    placeholder,
                ),
                name: place.name.clone(),
                location: format!("{}, {}", place.location.city, place.location.state),
                stars: star_row(place.rating),
            },
            participants: vec![
                card(&booking.booked_by, true),
                card(&booking.matched_user, false),
            ],
        })
    }

    /// Full view model
    #[must_use]
    pub fn view(&self) -> DateDetailView {
        let body = match (&self.phase, self.detail()) {
            (Phase::Failed(error), _) => Body::Failed(error.clone()),
            (Phase::Idle, _) => Body::Idle,
            (_, Some(detail)) => Body::Ready(detail),
            (_, None) => Body::Loading,
        };
        DateDetailView {
            loading: self.phase.is_loading(),
            body,
        }
    }
}
