//! Display helpers shared by every screen

use chrono::{DateTime, NaiveDate, Utc};

/// Number of stars in a rating row
pub const STAR_COUNT: usize = 5;

/// Format a timestamp as `M/D/YYYY`
#[must_use]
pub fn format_display_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%-m/%-d/%Y").to_string()
}

/// Format a server date string as `M/D/YYYY`
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates. Anything else is
/// returned unchanged so the screen still shows what the server sent.
#[must_use]
pub fn format_server_date(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return format_display_date(&timestamp.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%-m/%-d/%Y").to_string();
    }
    tracing::debug!(raw, "unparseable server date");
    raw.to_string()
}

/// Avatar image URL generated from a user's first name
#[must_use]
pub fn avatar_url(base: &str, first_name: &str) -> String {
    format!("{base}?name={}", urlencoding::encode(first_name))
}

/// Use the photo when present, the placeholder otherwise
#[must_use]
pub fn photo_or_placeholder(photo: Option<&str>, placeholder: &str) -> String {
    photo
        .filter(|url| !url.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// Star row for a rating, `true` for every filled star
#[must_use]
pub fn star_row(rating: u8) -> [bool; STAR_COUNT] {
    let mut stars = [false; STAR_COUNT];
    for (index, star) in stars.iter_mut().enumerate() {
        *star = index < usize::from(rating);
    }
    stars
}

/// Render a star row as text, e.g. `★★★☆☆`
#[must_use]
pub fn star_text(rating: u8) -> String {
    star_row(rating)
        .iter()
        .map(|filled| if *filled { '★' } else { '☆' })
        .collect()
}

/// "Yes" or "No" badge text
#[must_use]
pub const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_display_date_drops_leading_zeros() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).single();
        assert_eq!(timestamp.map(|t| format_display_date(&t)), Some("3/5/2024".to_string()));
    }

    #[test]
    fn test_format_server_date_variants() {
        assert_eq!(format_server_date("2024-06-01"), "6/1/2024");
        assert_eq!(format_server_date("2024-12-25T20:00:00.000Z"), "12/25/2024");
        assert_eq!(format_server_date("next friday"), "next friday");
    }

    #[test]
    fn test_avatar_url_encodes_name() {
        assert_eq!(
            avatar_url("https://ui-avatars.com/api/", "Ada"),
            "https://ui-avatars.com/api/?name=Ada"
        );
        assert_eq!(
            avatar_url("https://ui-avatars.com/api/", "Mary Jane"),
            "https://ui-avatars.com/api/?name=Mary%20Jane"
        );
    }

    #[test]
    fn test_photo_or_placeholder() {
        assert_eq!(photo_or_placeholder(None, "/placeholder.svg"), "/placeholder.svg");
        assert_eq!(photo_or_placeholder(Some(""), "/placeholder.svg"), "/placeholder.svg");
        assert_eq!(
            photo_or_placeholder(Some("https://cdn/a.png"), "/placeholder.svg"),
            "https://cdn/a.png"
        );
    }

    #[test]
    fn test_star_row() {
        assert_eq!(star_row(0), [false; 5]);
        assert_eq!(star_row(3), [true, true, true, false, false]);
        assert_eq!(star_row(9), [true; 5]);
        assert_eq!(star_text(2), "★★☆☆☆");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }
}
