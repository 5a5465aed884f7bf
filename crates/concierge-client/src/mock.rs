//! In-memory admin API for tests and offline demos

use crate::error::{ClientError, ClientResult};
use crate::service::{AdminApi, NewCategory, NotifyRequest, Operation, PlacePayload, paths};
use async_trait::async_trait;
use concierge_core::types::{
    Booking, BookingDetail, Category, Match, Place, PlaceLocation, RecordId,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How the next call of an operation should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Answer with a non-2xx status and body messages
    Status {
        /// HTTP status code
        status: u16,
        /// Messages placed in the body
        messages: Vec<String>,
    },
    /// Fail before any response arrives
    Transport(String),
    /// Answer a list request with something that is not a list
    NotAList,
}

impl MockFailure {
    /// Plain server error without messages
    #[must_use]
    pub const fn server_error() -> Self {
        Self::Status {
            status: 500,
            messages: Vec::new(),
        }
    }

    /// Validation failure carrying server messages
    #[must_use]
    pub fn rejected<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Status {
            status: 422,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    fn into_error(self, path: &str) -> ClientError {
        match self {
            Self::Status { status, messages } => ClientError::Api { status, messages },
            Self::Transport(message) => ClientError::transport(path, message),
            Self::NotAList => ClientError::UnexpectedShape {
                path: path.to_string(),
            },
        }
    }
}

/// Body recorded with a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallBody {
    /// No body
    Empty,
    /// JSON body
    Json(serde_json::Value),
    /// Multipart place form
    Form(PlacePayload),
}

/// One request received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    /// Operation invoked
    pub operation: Operation,
    /// Request path
    pub path: String,
    /// Request body
    pub body: CallBody,
}

#[derive(Debug, Default)]
struct MockState {
    matches: Vec<Match>,
    bookings: Vec<Booking>,
    details: HashMap<RecordId, BookingDetail>,
    places: Vec<Place>,
    categories: Vec<Category>,
    next_id: u64,
}

/// Mock admin API backed by in-memory collections
///
/// Mutations are applied the way the real server applies them, so a re-fetch
/// after a successful write reflects the change.
#[derive(Debug, Default)]
pub struct MockAdminApi {
    state: Mutex<MockState>,
    calls: Mutex<Vec<ApiCall>>,
    failures: Mutex<HashMap<Operation, MockFailure>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        messages: vec![format!("{what} not found")],
    }
}

impl MockAdminApi {
    /// Create an empty mock backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed bonded matches
    #[must_use]
    pub fn with_matches(self, matches: Vec<Match>) -> Self {
        lock(&self.state).matches = matches;
        self
    }

    /// Seed pending bookings
    #[must_use]
    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        lock(&self.state).bookings = bookings;
        self
    }

    /// Seed a booking detail served by `get_booking`
    #[must_use]
    pub fn with_booking_detail(self, detail: BookingDetail) -> Self {
        lock(&self.state).details.insert(detail.id.clone(), detail);
        self
    }

    /// Seed the place catalog
    #[must_use]
    pub fn with_places(self, places: Vec<Place>) -> Self {
        lock(&self.state).places = places;
        self
    }

    /// Seed categories
    #[must_use]
    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        lock(&self.state).categories = categories;
        self
    }

    /// Make the next call of `operation` fail
    pub fn fail_next(&self, operation: Operation, failure: MockFailure) {
        lock(&self.failures).insert(operation, failure);
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    /// Calls of one operation, in order
    #[must_use]
    pub fn calls_of(&self, operation: Operation) -> Vec<ApiCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Current matches
    #[must_use]
    pub fn matches(&self) -> Vec<Match> {
        lock(&self.state).matches.clone()
    }

    /// Current places
    #[must_use]
    pub fn places(&self) -> Vec<Place> {
        lock(&self.state).places.clone()
    }

    /// Current categories
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        lock(&self.state).categories.clone()
    }

    /// Record the call, then consume a pending failure for it if there is one
    fn enter(&self, operation: Operation, path: &str, body: CallBody) -> ClientResult<()> {
        lock(&self.calls).push(ApiCall {
            operation,
            path: path.to_string(),
            body,
        });

        match lock(&self.failures).remove(&operation) {
            Some(failure) => {
                tracing::debug!(%operation, ?failure, "mock failing call");
                Err(failure.into_error(path))
            }
            None => Ok(()),
        }
    }

    fn apply_place_fields(place: &mut Place, payload: &PlacePayload) {
        for (key, value) in payload.fields() {
            match key.as_str() {
                "name" => place.name.clone_from(value),
                "category_id" => place.category_id = RecordId::from(value.as_str()),
                "about" => place.about.clone_from(value),
                "rating" => place.rating = value.parse().unwrap_or(place.rating),
                "opening_hour" => place.opening_hour.clone_from(value),
                "closing_hour" => place.closing_hour.clone_from(value),
                "weekend_opening_hour" => place.weekend_opening_hour.clone_from(value),
                "weekend_closing_hour" => place.weekend_closing_hour.clone_from(value),
                "city" => place.location.city.clone_from(value),
                "state" => place.location.state.clone_from(value),
                "country" => place.location.country.clone_from(value),
                "latitude" => {
                    place.location.latitude = value.parse().unwrap_or(place.location.latitude);
                }
                "longitude" => {
                    place.location.longitude = value.parse().unwrap_or(place.location.longitude);
                }
                _ => {}
            }
        }

        if let Some(banner) = payload.file("banner1") {
            place.banner = Some(format!("https://cdn.mock/{}", banner.file_name));
        }
        if let Some(menu) = payload.file("menu_image") {
            place.menu_url = Some(format!("https://cdn.mock/{}", menu.file_name));
        }
    }

    fn missing_required(payload: &PlacePayload) -> Vec<String> {
        ["category_id", "name", "about"]
            .into_iter()
            .filter(|key| payload.field(key).is_none_or(str::is_empty))
            .map(|key| format!("{key} should not be empty"))
            .collect()
    }
}

#[async_trait]
impl AdminApi for MockAdminApi {
    async fn list_bonded_matches(&self) -> ClientResult<Vec<Match>> {
        self.enter(Operation::ListBondedMatches, paths::BONDED, CallBody::Empty)?;
        Ok(lock(&self.state).matches.clone())
    }

    async fn notify_match(&self, request: &NotifyRequest) -> ClientResult<()> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::decode(paths::NOTIFY, e.to_string()))?;
        self.enter(Operation::NotifyMatch, paths::NOTIFY, CallBody::Json(body))?;

        let mut state = lock(&self.state);
        let mut found = false;
        for record in state.matches.iter_mut().filter(|record| {
            record.user_one_id == request.user_one_id && record.user_two_id == request.user_two_id
        }) {
            record.notify = true;
            found = true;
        }

        if found { Ok(()) } else { Err(not_found("Match")) }
    }

    async fn list_pending_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.enter(Operation::ListPendingBookings, paths::PENDING, CallBody::Empty)?;
        Ok(lock(&self.state).bookings.clone())
    }

    async fn get_booking(&self, id: &RecordId) -> ClientResult<BookingDetail> {
        self.enter(Operation::GetBooking, &paths::booking(id), CallBody::Empty)?;
        lock(&self.state)
            .details
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Booking"))
    }

    async fn list_places(&self) -> ClientResult<Vec<Place>> {
        self.enter(Operation::ListPlaces, paths::PLACES, CallBody::Empty)?;
        Ok(lock(&self.state).places.clone())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.enter(Operation::ListCategories, paths::CATEGORIES, CallBody::Empty)?;
        Ok(lock(&self.state).categories.clone())
    }

    async fn create_place(&self, payload: &PlacePayload) -> ClientResult<()> {
        self.enter(
            Operation::CreatePlace,
            paths::NEW_PLACE,
            CallBody::Form(payload.clone()),
        )?;

        let missing = Self::missing_required(payload);
        if !missing.is_empty() {
            return Err(ClientError::Api {
                status: 422,
                messages: missing,
            });
        }

        let mut state = lock(&self.state);
        state.next_id += 1;
        let mut place = Place {
            id: RecordId::new(format!("place-{}", state.next_id)),
            name: String::new(),
            location: PlaceLocation {
                city: String::new(),
                state: String::new(),
                country: String::new(),
                latitude: 0.0,
                longitude: 0.0,
            },
            category_id: RecordId::new(""),
            rating: 0,
            opening_hour: String::new(),
            closing_hour: String::new(),
            weekend_opening_hour: String::new(),
            weekend_closing_hour: String::new(),
            menu_url: None,
            about: String::new(),
            banner: None,
        };
        Self::apply_place_fields(&mut place, payload);
        state.places.push(place);
        Ok(())
    }

    async fn edit_place(&self, payload: &PlacePayload) -> ClientResult<()> {
        self.enter(
            Operation::EditPlace,
            paths::EDIT_PLACE,
            CallBody::Form(payload.clone()),
        )?;

        let id = payload.field("id").ok_or_else(|| ClientError::Api {
            status: 422,
            messages: vec!["id should not be empty".to_string()],
        })?;

        let mut state = lock(&self.state);
        let place = state
            .places
            .iter_mut()
            .find(|place| place.id.as_str() == id)
            .ok_or_else(|| not_found("Place"))?;
        Self::apply_place_fields(place, payload);
        Ok(())
    }

    async fn create_category(&self, category: &NewCategory) -> ClientResult<()> {
        let body = serde_json::to_value(category)
            .map_err(|e| ClientError::decode(paths::NEW_CATEGORY, e.to_string()))?;
        self.enter(Operation::CreateCategory, paths::NEW_CATEGORY, CallBody::Json(body))?;

        if category.name.trim().is_empty() {
            return Err(ClientError::Api {
                status: 422,
                messages: vec!["name should not be empty".to_string()],
            });
        }

        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = RecordId::new(format!("category-{}", state.next_id));
        state.categories.push(Category {
            id,
            name: category.name.clone(),
        });
        Ok(())
    }

    async fn delete_place(&self, id: &RecordId) -> ClientResult<()> {
        self.enter(Operation::DeletePlace, &paths::delete_place(id), CallBody::Empty)?;

        let mut state = lock(&self.state);
        let before = state.places.len();
        state.places.retain(|place| &place.id != id);
        if state.places.len() == before {
            return Err(not_found("Place"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
