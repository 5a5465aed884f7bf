//! The admin API seam and the request types it accepts

use crate::error::ClientResult;
use async_trait::async_trait;
use concierge_core::types::{
    Attachment, Booking, BookingDetail, Category, Match, Place, RecordId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations offered by the remote admin API
///
/// Every screen talks to the backend exclusively through an implementation of
/// this trait, so tests can substitute [`crate::MockAdminApi`] for the HTTP
/// client.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /admin/date/bonded`
    async fn list_bonded_matches(&self) -> ClientResult<Vec<Match>>;

    /// `POST /admin/date/notify`
    async fn notify_match(&self, request: &NotifyRequest) -> ClientResult<()>;

    /// `GET /admin/date/pending`
    async fn list_pending_bookings(&self) -> ClientResult<Vec<Booking>>;

    /// `GET /admin/date/{id}`
    async fn get_booking(&self, id: &RecordId) -> ClientResult<BookingDetail>;

    /// `GET /admin/place/all`
    async fn list_places(&self) -> ClientResult<Vec<Place>>;

    /// `GET /admin/place/all-categories`
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    /// `POST /admin/place/new` as a multipart form
    async fn create_place(&self, payload: &PlacePayload) -> ClientResult<()>;

    /// `POST /admin/place/edit` as a multipart form
    async fn edit_place(&self, payload: &PlacePayload) -> ClientResult<()>;

    /// `POST /admin/place/new-category`
    async fn create_category(&self, category: &NewCategory) -> ClientResult<()>;

    /// `DELETE /admin/place/delete/{id}`
    async fn delete_place(&self, id: &RecordId) -> ClientResult<()>;

    /// Backend name, used in logs
    fn name(&self) -> &str;
}

/// Identifies one admin API operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// List bonded matches
    ListBondedMatches,
    /// Notify a matched pair
    NotifyMatch,
    /// List pending bookings
    ListPendingBookings,
    /// Fetch one booking
    GetBooking,
    /// List places
    ListPlaces,
    /// List categories
    ListCategories,
    /// Create a place
    CreatePlace,
    /// Edit a place
    EditPlace,
    /// Create a category
    CreateCategory,
    /// Delete a place
    DeletePlace,
}

impl Operation {
    /// HTTP method used by the operation
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::ListBondedMatches
            | Self::ListPendingBookings
            | Self::GetBooking
            | Self::ListPlaces
            | Self::ListCategories => "GET",
            Self::NotifyMatch | Self::CreatePlace | Self::EditPlace | Self::CreateCategory => {
                "POST"
            }
            Self::DeletePlace => "DELETE",
        }
    }

    /// Whether the operation changes server state
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(
            self,
            Self::ListBondedMatches
                | Self::ListPendingBookings
                | Self::GetBooking
                | Self::ListPlaces
                | Self::ListCategories
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListBondedMatches => "list_bonded_matches",
            Self::NotifyMatch => "notify_match",
            Self::ListPendingBookings => "list_pending_bookings",
            Self::GetBooking => "get_booking",
            Self::ListPlaces => "list_places",
            Self::ListCategories => "list_categories",
            Self::CreatePlace => "create_place",
            Self::EditPlace => "edit_place",
            Self::CreateCategory => "create_category",
            Self::DeletePlace => "delete_place",
        };
        f.write_str(name)
    }
}

/// Request paths, relative to the configured base URL
pub mod paths {
    use concierge_core::types::RecordId;

    /// Bonded matches
    pub const BONDED: &str = "/admin/date/bonded";
    /// Notify a matched pair
    pub const NOTIFY: &str = "/admin/date/notify";
    /// Pending bookings
    pub const PENDING: &str = "/admin/date/pending";
    /// All places
    pub const PLACES: &str = "/admin/place/all";
    /// All categories
    pub const CATEGORIES: &str = "/admin/place/all-categories";
    /// Create a place
    pub const NEW_PLACE: &str = "/admin/place/new";
    /// Edit a place
    pub const EDIT_PLACE: &str = "/admin/place/edit";
    /// Create a category
    pub const NEW_CATEGORY: &str = "/admin/place/new-category";

    /// One booking
    #[must_use]
    pub fn booking(id: &RecordId) -> String {
        format!("/admin/date/{}", urlencoding::encode(id.as_str()))
    }

    /// Delete one place
    #[must_use]
    pub fn delete_place(id: &RecordId) -> String {
        format!("/admin/place/delete/{}", urlencoding::encode(id.as_str()))
    }
}

/// Body of the notify request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyRequest {
    /// User who sent the match
    pub user_one_id: RecordId,
    /// User who accepted the match
    pub user_two_id: RecordId,
}

impl From<&Match> for NotifyRequest {
    fn from(record: &Match) -> Self {
        Self {
            user_one_id: record.user_one_id.clone(),
            user_two_id: record.user_two_id.clone(),
        }
    }
}

/// Body of the create-category request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Category name
    pub name: String,
}

/// Ordered multipart payload for place writes
///
/// Text fields and files are kept in insertion order; the form is sent with
/// every text part first, then every file part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacePayload {
    fields: Vec<(String, String)>,
    files: Vec<(String, Attachment)>,
}

impl PlacePayload {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn push_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Append a file part
    pub fn push_file(&mut self, key: impl Into<String>, attachment: Attachment) {
        self.files.push((key.into(), attachment));
    }

    /// Text fields in order
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// File parts in order
    #[must_use]
    pub fn files(&self) -> &[(String, Attachment)] {
        &self.files
    }

    /// First value of a text field
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// First file attached under a key
    #[must_use]
    pub fn file(&self, key: &str) -> Option<&Attachment> {
        self.files
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, attachment)| attachment)
    }

    /// Every part name, text fields first, in send order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|(key, _)| key.as_str())
            .chain(self.files.iter().map(|(key, _)| key.as_str()))
            .collect()
    }
}
