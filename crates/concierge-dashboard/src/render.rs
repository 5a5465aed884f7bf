//! Plain-text rendering of screen views for the terminal

use crate::screens::{BondedView, DateDetailView, DatesView, PlacesView, WizardView};
use crate::state::{Body, NotificationView, Severity};
use concierge_core::utils::star_text;

/// Render a view as terminal text
pub trait Render {
    /// Lines to print, without trailing newline
    fn render(&self) -> String;
}

fn body_lines<T>(body: &Body<T>, content: impl FnOnce(&T) -> Vec<String>) -> Vec<String> {
    match body {
        Body::Idle => Vec::new(),
        Body::Loading => vec!["Loading...".to_string()],
        Body::Failed(error) => {
            let mut lines = vec![format!("Error: {}", error.message)];
            if error.can_go_back {
                lines.push("[Go Back]".to_string());
            }
            lines
        }
        Body::Empty(message) => vec![message.clone()],
        Body::Ready(items) => content(items),
    }
}

fn notification_line(notification: Option<&NotificationView>) -> Option<String> {
    notification.map(|notice| {
        let tag = match notice.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        format!("[{tag}] {}", notice.message)
    })
}

fn finish(mut lines: Vec<String>, notification: Option<&NotificationView>) -> String {
    lines.extend(notification_line(notification));
    lines.join("\n")
}

impl Render for BondedView {
    fn render(&self) -> String {
        let lines = body_lines(&self.body, |rows| {
            rows.iter()
                .map(|row| {
                    format!(
                        "{:<12} {} & {:<20} {:<25} {}{}",
                        row.match_id,
                        row.names[0],
                        row.names[1],
                        row.dates,
                        row.action_label,
                        if row.action_enabled { "" } else { " (disabled)" }
                    )
                })
                .collect()
        });
        finish(lines, self.notification.as_ref())
    }
}

impl Render for DatesView {
    fn render(&self) -> String {
        body_lines(&self.body, |rows| {
            rows.iter()
                .map(|row| {
                    format!(
                        "{:<12} {} | {} & {} | Security details: {} | Logistics: {}",
                        row.id,
                        row.pick_up_location,
                        row.names[0],
                        row.names[1],
                        row.security,
                        row.logistics
                    )
                })
                .collect()
        })
        .join("\n")
    }
}

impl Render for DateDetailView {
    fn render(&self) -> String {
        body_lines(&self.body, |detail| {
            let place = &detail.place;
            let stars: String = place
                .stars
                .iter()
                .map(|filled| if *filled { '★' } else { '☆' })
                .collect();
            let mut lines = vec![
                format!(
                    "Date {} on {} at {} ({})",
                    detail.id, detail.date, detail.time, detail.status
                ),
                format!("{} - {} {stars}", place.name, place.location),
            ];
            for participant in &detail.participants {
                lines.push(format!("* {}", participant.name));
                if let Some(pick_up) = &participant.pick_up_location {
                    lines.push(format!("  Pickup: {pick_up}"));
                }
                if let Some(ride) = &participant.ride {
                    lines.push(format!("  Ride: {ride}"));
                }
                if let Some(security) = &participant.security {
                    lines.push(format!(
                        "  Security: {}, {}",
                        security.summary, security.preference
                    ));
                }
                if let Some(question) = &participant.security_question {
                    lines.push(format!("  Security question: {question}"));
                }
            }
            lines
        })
        .join("\n")
    }
}

impl Render for WizardView {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "Place form ({}) step {} of 2, rating {}",
            self.mode,
            self.step,
            star_text(self.rating)
        )];
        if let Some(location) = &self.location {
            lines.push(format!("Location: {location}"));
        }
        for (slot, banner) in self.banners.iter().enumerate() {
            if let Some(file) = banner {
                let preview = self
                    .previews
                    .get(slot)
                    .is_some_and(Option::is_some);
                lines.push(format!(
                    "Banner {}: {file}{}",
                    slot + 1,
                    if preview { " (preview ready)" } else { "" }
                ));
            }
        }
        if let Some(menu) = &self.menu {
            lines.push(format!("Menu: {menu}"));
        }
        lines.extend(self.errors.iter().map(|error| format!("Error: {error}")));
        lines.join("\n")
    }
}

impl Render for PlacesView {
    fn render(&self) -> String {
        let mut lines = body_lines(&self.body, |cards| {
            cards
                .iter()
                .map(|card| format!("{:<12} {:<30} {}", card.id, card.name, card.location))
                .collect()
        });
        if let Some(sheet) = &self.action_sheet {
            lines.push(format!("{}: {}", sheet.place_name, sheet.actions.join(" / ")));
        }
        if let Some(wizard) = &self.wizard {
            lines.push(wizard.render());
        }
        if self.category_form_open {
            lines.push("New category form open".to_string());
        }
        finish(lines, self.notification.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::BondedRow;
    use crate::state::BlockingError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blocking_error_with_go_back() {
        let view = DatesView {
            loading: false,
            body: Body::Failed(BlockingError::with_go_back("Date not found")),
        };
        assert_eq!(view.render(), "Error: Date not found\n[Go Back]");
    }

    #[test]
    fn test_bonded_rows_and_notice() {
        let view = BondedView {
            loading: false,
            body: Body::Ready(vec![BondedRow {
                match_id: "m1".to_string(),
                avatars: [String::new(), String::new()],
                names: ["Ana".to_string(), "Ben".to_string()],
                dates: "1/2/2024 - 1/3/2024".to_string(),
                action_label: "Notified",
                action_enabled: false,
            }]),
            notification: Some(NotificationView {
                message: "Users notified successfully".to_string(),
                severity: Severity::Success,
            }),
        };

        let text = view.render();
        assert!(text.contains("Ana & Ben"));
        assert!(text.contains("Notified (disabled)"));
        assert!(text.ends_with("[ok] Users notified successfully"));
    }

    #[test]
    fn test_empty_state() {
        let view = DatesView {
            loading: false,
            body: Body::Empty("No pending dates".to_string()),
        };
        assert_eq!(view.render(), "No pending dates");
    }
}
