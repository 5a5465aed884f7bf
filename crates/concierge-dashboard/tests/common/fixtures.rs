//! Test fixtures and sample data

use chrono::{DateTime, TimeZone, Utc};
use concierge_core::types::{
    Attachment, BookedRide, BookedSecurity, Booking, BookingDetail, CarRide, Category, CityState,
    Match, MatchUser, Named, Participant, Place, PlaceLocation, PlacePhoto, PlaceReservation,
    ProfilePhoto, RecordId, ReservedPlace, SecurityOrganization, SelectedLocation,
};

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn user(id: &str, first_name: &str) -> MatchUser {
    MatchUser {
        id: RecordId::from(id),
        first_name: first_name.to_string(),
        tier: "gold".to_string(),
        user_trait: serde_json::Map::new(),
        user_location: None,
    }
}

/// Sample bonded matches
pub struct MatchFixtures;

impl MatchFixtures {
    /// Match between two users, notified or not
    pub fn bonded(id: &str, sender: (&str, &str), accepter: (&str, &str), notify: bool) -> Match {
        Match {
            id: RecordId::from(id),
            created_at: at(2024, 1, 2),
            updated_at: at(2024, 1, 15),
            user_one_id: RecordId::from(sender.0),
            user_two_id: RecordId::from(accepter.0),
            notify,
            user_sent_match: user(sender.0, sender.1),
            user_accept_match: user(accepter.0, accepter.1),
        }
    }

    /// One match awaiting notification and one already notified
    pub fn pair() -> Vec<Match> {
        vec![
            Self::bonded("m1", ("u1", "Ana"), ("u2", "Ben"), false),
            Self::bonded("m2", ("u3", "Cara"), ("u4", "Dev"), true),
        ]
    }
}

fn participant(first_name: &str, photo: Option<&str>) -> Participant {
    Participant {
        first_name: first_name.to_string(),
        profile_photo: photo.map(|url| ProfilePhoto {
            url: Some(url.to_string()),
        }),
    }
}

/// Sample bookings
pub struct BookingFixtures;

impl BookingFixtures {
    /// Pending booking with security and no ride
    pub fn pending(id: &str) -> Booking {
        Booking {
            id: RecordId::from(id),
            pick_up_location: "12 Main St".to_string(),
            booked_by: participant("Ana", Some("https://img.test/ana.png")),
            matched_user: participant("Ben", None),
            security_booking_id: Some(RecordId::from("s1")),
            car_booking_id: None,
        }
    }

    /// Full detail with ride, security and a security question
    pub fn detail(id: &str) -> BookingDetail {
        BookingDetail {
            id: RecordId::from(id),
            scheduled_date: "2024-03-09T00:00:00.000Z".to_string(),
            scheduled_time: "19:30".to_string(),
            status: "pending".to_string(),
            pick_up_location: "12 Main St".to_string(),
            booked_by: participant("Ana", Some("https://img.test/ana.png")),
            matched_user: participant("Ben", None),
            place_reservation: PlaceReservation {
                place: ReservedPlace {
                    name: "Skyline".to_string(),
                    rating: 4,
                    location: CityState {
                        city: "Austin".to_string(),
                        state: "TX".to_string(),
                    },
                    place_photos: vec![PlacePhoto {
                        image_url: "https://img.test/skyline.png".to_string(),
                    }],
                },
            },
            booked_security: Some(BookedSecurity {
                number_of_escorts: 2,
                gender_preference: "any".to_string(),
                security: SecurityOrganization {
                    organization_name: "Shield".to_string(),
                },
            }),
            booked_ride: Some(BookedRide {
                car_ride: CarRide {
                    brand: Named {
                        name: "Tesla".to_string(),
                    },
                    category: Named {
                        name: "Sedan".to_string(),
                    },
                },
            }),
            security_question: Some("First pet?".to_string()),
        }
    }
}

/// Sample catalog data
pub struct PlaceFixtures;

impl PlaceFixtures {
    /// Place in Austin
    pub fn place(id: &str, name: &str) -> Place {
        Place {
            id: RecordId::from(id),
            name: name.to_string(),
            location: PlaceLocation {
                city: "Austin".to_string(),
                state: "TX".to_string(),
                country: "USA".to_string(),
                latitude: 30.2672,
                longitude: -97.7431,
            },
            category_id: RecordId::from("c1"),
            rating: 3,
            opening_hour: "10:00".to_string(),
            closing_hour: "22:00".to_string(),
            weekend_opening_hour: "12:00".to_string(),
            weekend_closing_hour: "02:00".to_string(),
            menu_url: None,
            about: "Rooftop lounge".to_string(),
            banner: None,
        }
    }

    /// Category
    pub fn category(id: &str, name: &str) -> Category {
        Category {
            id: RecordId::from(id),
            name: name.to_string(),
        }
    }

    /// Location picker result
    pub fn picked_location() -> SelectedLocation {
        SelectedLocation {
            city: "Denver".to_string(),
            state: "CO".to_string(),
            country: "USA".to_string(),
            latitude: "39.7392".to_string(),
            longitude: "-104.9903".to_string(),
        }
    }

    /// Small PNG-named banner
    pub fn banner(name: &str) -> Attachment {
        Attachment::new(name, vec![0x89, 0x50, 0x4e, 0x47])
    }

    /// Menu document
    pub fn menu() -> Attachment {
        Attachment::new("menu.pdf", b"%PDF-1.4".to_vec())
    }
}
