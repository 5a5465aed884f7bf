//! Record types returned by the admin API

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, path::Path};

/// Server-assigned identifier
///
/// The admin API is not consistent about identifier types: bookings use
/// integers, matches and places use strings. Both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from anything string-like
    #[must_use]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Integer(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// Read a star rating from any JSON number
///
/// Fractional averages round to the nearest star and null counts as unrated.
/// The result is clamped to 0..=5.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 5.0) as u8)
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A confirmed pairing between two platform users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Match identifier
    pub id: RecordId,

    /// When the match was proposed
    pub created_at: DateTime<Utc>,

    /// When the match was last touched (accepted, notified)
    pub updated_at: DateTime<Utc>,

    /// User who sent the match
    pub user_one_id: RecordId,

    /// User who accepted the match
    pub user_two_id: RecordId,

    /// Whether both users have already been notified
    #[serde(default)]
    pub notify: bool,

    /// Profile of the user who sent the match
    pub user_sent_match: MatchUser,

    /// Profile of the user who accepted the match
    pub user_accept_match: MatchUser,
}

/// Minimal user profile embedded in a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchUser {
    /// User identifier
    pub id: RecordId,

    /// First name
    pub first_name: String,

    /// Membership tier label
    #[serde(default)]
    pub tier: String,

    /// Free-form trait map
    #[serde(rename = "userTrait", default)]
    pub user_trait: serde_json::Map<String, serde_json::Value>,

    /// Home location, when the user has set one
    #[serde(rename = "userLocation", default)]
    pub user_location: Option<UserLocation>,
}

/// Coarse home location of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLocation {
    /// Location identifier
    pub id: RecordId,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
}

/// Profile photo reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePhoto {
    /// Public image URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Participant of a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// First name
    pub first_name: String,

    /// Profile photo, absent for users who never uploaded one
    #[serde(rename = "profilePhoto", default)]
    pub profile_photo: Option<ProfilePhoto>,
}

impl Participant {
    /// Photo URL if the participant has a non-empty one
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.profile_photo
            .as_ref()
            .and_then(|photo| photo.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// A pending booking as listed on the dates screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: RecordId,

    /// Where the couple is picked up
    pub pick_up_location: String,

    /// User who made the booking
    pub booked_by: Participant,

    /// The other user
    pub matched_user: Participant,

    /// Linked security escort booking
    #[serde(default)]
    pub security_booking_id: Option<RecordId>,

    /// Linked ride booking
    #[serde(default)]
    pub car_booking_id: Option<RecordId>,
}

/// Full booking as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetail {
    /// Booking identifier
    pub id: RecordId,

    /// Scheduled day, an ISO date or timestamp
    pub scheduled_date: String,

    /// Scheduled time as entered by the user
    pub scheduled_time: String,

    /// Server-assigned status label
    pub status: String,

    /// Where the couple is picked up
    pub pick_up_location: String,

    /// User who made the booking
    pub booked_by: Participant,

    /// The other user
    pub matched_user: Participant,

    /// Reserved venue
    pub place_reservation: PlaceReservation,

    /// Security escort sub-booking
    #[serde(default)]
    pub booked_security: Option<BookedSecurity>,

    /// Ride sub-booking
    #[serde(default)]
    pub booked_ride: Option<BookedRide>,

    /// Question the escort asks at pickup
    #[serde(default)]
    pub security_question: Option<String>,
}

/// Venue reservation attached to a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReservation {
    /// Reserved place
    pub place: ReservedPlace,
}

/// Venue summary embedded in a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedPlace {
    /// Venue name
    pub name: String,

    /// Star rating
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,

    /// City and state of the venue
    pub location: CityState,

    /// Venue photos, first one is the cover
    #[serde(rename = "placePhotos", default)]
    pub place_photos: Vec<PlacePhoto>,
}

/// City and state pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityState {
    /// City
    pub city: String,
    /// State or region
    pub state: String,
}

/// Venue photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacePhoto {
    /// Public image URL
    pub image_url: String,
}

/// Security escort sub-booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSecurity {
    /// Number of escorts
    pub number_of_escorts: u32,
    /// Requested escort gender
    pub gender_preference: String,
    /// Providing organization
    pub security: SecurityOrganization,
}

/// Security provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityOrganization {
    /// Organization name
    pub organization_name: String,
}

/// Ride sub-booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedRide {
    /// Booked car
    pub car_ride: CarRide,
}

/// Car description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRide {
    /// Car brand
    pub brand: Named,
    /// Car category
    pub category: Named,
}

/// Anything the API describes only by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    /// Display name
    pub name: String,
}

/// A venue in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Place identifier
    pub id: RecordId,

    /// Venue name
    pub name: String,

    /// Geocoded location
    pub location: PlaceLocation,

    /// Category the venue belongs to
    pub category_id: RecordId,

    /// Star rating, 0 when never rated
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,

    /// Weekday opening hour
    #[serde(default)]
    pub opening_hour: String,

    /// Weekday closing hour
    #[serde(default)]
    pub closing_hour: String,

    /// Weekend opening hour
    #[serde(default)]
    pub weekend_opening_hour: String,

    /// Weekend closing hour
    #[serde(default)]
    pub weekend_closing_hour: String,

    /// Uploaded menu document
    #[serde(default)]
    pub menu_url: Option<String>,

    /// Free-text description
    #[serde(default)]
    pub about: String,

    /// Primary banner image
    #[serde(default)]
    pub banner: Option<String>,
}

/// Geocoded place location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    #[serde(default)]
    pub country: String,
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees
    #[serde(default)]
    pub longitude: f64,
}

impl PlaceLocation {
    /// "city, state, country", the text the location field shows
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.country)
    }
}

/// Place category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: RecordId,
    /// Category name
    pub name: String,
}

/// Result of the location picker
///
/// Coordinates stay textual because they are forwarded to the server as form
/// fields exactly as the picker produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLocation {
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
    /// Latitude as text
    pub latitude: String,
    /// Longitude as text
    pub longitude: String,
}

impl SelectedLocation {
    /// "city, state, country"
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.country)
    }
}

/// A file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name sent with the part
    pub file_name: String,
    /// MIME type sent with the part
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// Build an attachment from memory, guessing the content type from the name
    #[must_use]
    pub fn new<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an attachment from disk
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Attachment`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> crate::Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| crate::Error::Attachment {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        tracing::debug!(file = %file_name, bytes = bytes.len(), "read attachment");
        Ok(Self::new(file_name, bytes))
    }

    /// Inline `data:` URL used for local previews
    #[must_use]
    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type)
    }
}

/// Guess a MIME type from a file extension
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let from_text: RecordId = serde_json::from_value(json!("abc-1")).unwrap();
        let from_number: RecordId = serde_json::from_value(json!(42)).unwrap();

        assert_eq!(from_text.as_str(), "abc-1");
        assert_eq!(from_number, RecordId::from("42"));
        assert_eq!(serde_json::to_value(&from_number).unwrap(), json!("42"));
    }

    #[test]
    fn test_match_deserialization() {
        let value = json!({
            "id": "m1",
            "created_at": "2024-03-05T10:00:00.000Z",
            "updated_at": "2024-03-09T18:30:00.000Z",
            "user_one_id": "u1",
            "user_two_id": "u2",
            "notify": false,
            "user_sent_match": {
                "id": "u1",
                "first_name": "Ada",
                "tier": "gold",
                "userTrait": {"height": 170},
                "userLocation": {"id": "l1", "city": "Austin", "state": "TX"}
            },
            "user_accept_match": {
                "id": "u2",
                "first_name": "Grace",
                "tier": "silver",
                "userTrait": {},
                "userLocation": null
            }
        });

        let record: Match = serde_json::from_value(value).unwrap();

        assert_eq!(record.user_sent_match.first_name, "Ada");
        assert_eq!(record.user_sent_match.user_trait.len(), 1);
        assert!(record.user_accept_match.user_location.is_none());
        assert!(!record.notify);
    }

    #[test]
    fn test_participant_photo_url_skips_missing_and_empty() {
        let none: Participant =
            serde_json::from_value(json!({"first_name": "Ada", "profilePhoto": null})).unwrap();
        let empty: Participant =
            serde_json::from_value(json!({"first_name": "Ada", "profilePhoto": {"url": ""}}))
                .unwrap();
        let set: Participant = serde_json::from_value(
            json!({"first_name": "Ada", "profilePhoto": {"url": "https://cdn/ada.png"}}),
        )
        .unwrap();

        assert_eq!(none.photo_url(), None);
        assert_eq!(empty.photo_url(), None);
        assert_eq!(set.photo_url(), Some("https://cdn/ada.png"));
    }

    #[test]
    fn test_booking_detail_optional_sections() {
        let value = json!({
            "id": 7,
            "scheduled_date": "2024-06-01",
            "scheduled_time": "19:30",
            "status": "pending",
            "pick_up_location": "12 Main St",
            "booked_by": {"first_name": "Ada", "profilePhoto": {"url": null}},
            "matched_user": {"first_name": "Grace", "profilePhoto": {"url": null}},
            "place_reservation": {
                "place": {
                    "name": "Skyline",
                    "rating": 4,
                    "location": {"city": "Austin", "state": "TX"}
                }
            }
        });

        let detail: BookingDetail = serde_json::from_value(value).unwrap();

        assert_eq!(detail.id.as_str(), "7");
        assert!(detail.place_reservation.place.place_photos.is_empty());
        assert!(detail.booked_security.is_none());
        assert!(detail.booked_ride.is_none());
        assert!(detail.security_question.is_none());
    }

    #[test]
    fn test_fractional_rating_rounds() {
        let place = |rating: serde_json::Value| -> ReservedPlace {
            serde_json::from_value(json!({
                "name": "Skyline",
                "rating": rating,
                "location": {"city": "Austin", "state": "TX"}
            }))
            .unwrap()
        };

        assert_eq!(place(json!(3.6)).rating, 4);
        assert_eq!(place(json!(4.2)).rating, 4);
        assert_eq!(place(json!(5)).rating, 5);
        assert_eq!(place(json!(9.5)).rating, 5);
        assert_eq!(place(json!(null)).rating, 0);
    }

    #[test]
    fn test_location_display() {
        let picked = SelectedLocation {
            city: "Lagos".to_string(),
            state: "Lagos".to_string(),
            country: "Nigeria".to_string(),
            latitude: "6.5244".to_string(),
            longitude: "3.3792".to_string(),
        };

        assert_eq!(picked.display(), "Lagos, Lagos, Nigeria");
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for("banner.PNG"), "image/png");
        assert_eq!(content_type_for("menu.pdf"), "application/pdf");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[test]
    fn test_data_url() {
        let attachment = Attachment::new("dot.png", vec![1, 2, 3]);
        assert_eq!(attachment.data_url(), "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();

        assert_eq!(attachment.file_name, "menu.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4".to_vec());
    }

    #[tokio::test]
    async fn test_attachment_from_missing_path() {
        let err = Attachment::from_path(Path::new("/no/such/banner.png"))
            .await
            .expect_err("missing file must fail");

        assert!(matches!(err, crate::Error::Attachment { .. }));
    }
}
