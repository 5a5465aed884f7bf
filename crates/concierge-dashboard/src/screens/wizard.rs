//! Two-step place form and the payload it produces

use crate::error::{DashboardError, DashboardResult};
use crate::screens::previews::{BANNER_SLOTS, PreviewJob, PreviewReady, PreviewSlots, check_slot};
use concierge_client::PlacePayload;
use concierge_core::types::{Attachment, Place, RecordId, SelectedLocation};
use concierge_core::utils::{STAR_COUNT, star_row};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lowest selectable star
pub const MIN_RATING: u8 = 1;
/// Highest selectable star
pub const MAX_RATING: u8 = 5;

/// Step-one values as typed into the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOneInput {
    /// Chosen category
    pub category_id: Option<RecordId>,
    /// Venue name
    pub name: String,
    /// Description
    pub about: String,
}

/// Accepted step-one values, carried into step two
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOne {
    /// Category id
    pub category_id: String,
    /// Venue name
    pub name: String,
    /// "city, state, country"
    pub location: String,
    /// Description
    pub about: String,
}

impl StepOne {
    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("category_id", self.category_id.as_str()),
            ("name", self.name.as_str()),
            ("location", self.location.as_str()),
            ("about", self.about.as_str()),
        ]
    }
}

/// Step-two values; hours are free text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTwo {
    /// Weekday opening hour
    pub opening_hour: String,
    /// Weekday closing hour
    pub closing_hour: String,
    /// Weekend opening hour
    pub weekend_opening_hour: String,
    /// Weekend closing hour
    pub weekend_closing_hour: String,
}

impl StepTwo {
    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("opening_hour", self.opening_hour.as_str()),
            ("closing_hour", self.closing_hour.as_str()),
            ("weekend_opening_hour", self.weekend_opening_hour.as_str()),
            ("weekend_closing_hour", self.weekend_closing_hour.as_str()),
        ]
    }

    fn missing(&self) -> Vec<String> {
        missing_keys(&self.fields())
    }
}

fn missing_keys(fields: &[(&'static str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| (*key).to_string())
        .collect()
}

/// Everything the final write is assembled from
#[derive(Debug, Clone, Copy)]
pub struct PayloadParts<'a> {
    /// Place being edited, `None` when creating
    pub edit_target: Option<&'a RecordId>,
    /// Accepted step-one values
    pub step_one: &'a StepOne,
    /// Step-two values
    pub step_two: &'a StepTwo,
    /// Star rating, 0 if never chosen
    pub rating: u8,
    /// Location picked in this session
    pub location: Option<&'a SelectedLocation>,
    /// Banner files by slot
    pub banners: &'a BTreeMap<usize, Attachment>,
    /// Menu document
    pub menu: Option<&'a Attachment>,
}

/// Merge both steps into the multipart payload
///
/// Order: `id` (edit only), step-one fields, step-two fields, `rating`, the
/// picked location's fields, `banner1`..`banner4` by slot, `menu_image`.
#[must_use]
pub fn assemble(parts: &PayloadParts<'_>) -> PlacePayload {
    let mut payload = PlacePayload::new();

    if let Some(id) = parts.edit_target {
        payload.push_field("id", id.as_str());
    }
    for (key, value) in parts
        .step_one
        .fields()
        .into_iter()
        .chain(parts.step_two.fields())
    {
        payload.push_field(key, value);
    }
    payload.push_field("rating", parts.rating.to_string());

    if let Some(location) = parts.location {
        payload.push_field("city", location.city.as_str());
        payload.push_field("state", location.state.as_str());
        payload.push_field("country", location.country.as_str());
        payload.push_field("latitude", location.latitude.as_str());
        payload.push_field("longitude", location.longitude.as_str());
    }

    for (slot, banner) in parts.banners {
        payload.push_file(format!("banner{}", slot + 1), banner.clone());
    }
    if let Some(menu) = parts.menu {
        payload.push_file("menu_image", menu.clone());
    }

    payload
}

/// Which step the wizard shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Category, name, location, description, rating
    Basics,
    /// Banners, hours, menu; holds the accepted step one
    Details(StepOne),
}

impl WizardStep {
    /// 1 or 2
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Details(_) => 2,
        }
    }
}

/// Open place form
///
/// Dropping the wizard discards every piece of transient form state (rating,
/// banners, previews, menu, edit target, picked location, errors).
#[derive(Debug, Clone)]
pub struct Wizard {
    edit_target: Option<Place>,
    step: WizardStep,
    rating: u8,
    selected_location: Option<SelectedLocation>,
    banners: BTreeMap<usize, Attachment>,
    previews: PreviewSlots,
    menu: Option<Attachment>,
    errors: Vec<String>,
    generation: u64,
}

impl Wizard {
    /// Empty form for a new place
    #[must_use]
    pub const fn create(generation: u64) -> Self {
        Self {
            edit_target: None,
            step: WizardStep::Basics,
            rating: 0,
            selected_location: None,
            banners: BTreeMap::new(),
            previews: PreviewSlots::empty(),
            menu: None,
            errors: Vec::new(),
            generation,
        }
    }

    /// Form pre-filled from an existing place
    #[must_use]
    pub fn edit(place: Place, generation: u64) -> Self {
        let rating = place.rating;
        Self {
            edit_target: Some(place),
            rating,
            ..Self::create(generation)
        }
    }

    /// Place being edited
    #[must_use]
    pub const fn edit_target(&self) -> Option<&Place> {
        self.edit_target.as_ref()
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Chosen rating, 0 if none
    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    /// Server messages from the last failed save
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Finished previews
    #[must_use]
    pub const fn previews(&self) -> &PreviewSlots {
        &self.previews
    }

    /// Generation used to discard stale preview results
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Step-one values an edit starts from
    #[must_use]
    pub fn initial_input(&self) -> StepOneInput {
        self.edit_target
            .as_ref()
            .map(|place| StepOneInput {
                category_id: Some(place.category_id.clone()),
                name: place.name.clone(),
                about: place.about.clone(),
            })
            .unwrap_or_default()
    }

    /// Location text shown in step one
    #[must_use]
    pub fn location_display(&self) -> Option<String> {
        self.selected_location
            .as_ref()
            .map(SelectedLocation::display)
            .or_else(|| {
                self.edit_target
                    .as_ref()
                    .map(|place| place.location.display())
            })
    }

    /// Choose a star
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRating`] outside 1..=5.
    pub fn set_rating(&mut self, rating: u8) -> DashboardResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DashboardError::InvalidRating(rating));
        }
        self.rating = rating;
        Ok(())
    }

    /// Store the location picker's result
    ///
    /// The pick is frozen into the display string when step one is accepted,
    /// so the picker only applies on step one.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::WrongStep`] if step two is already showing.
    pub fn select_location(&mut self, location: SelectedLocation) -> DashboardResult<()> {
        if let WizardStep::Details(_) = self.step {
            return Err(DashboardError::WrongStep {
                expected: 1,
                current: 2,
            });
        }
        self.selected_location = Some(location);
        Ok(())
    }

    /// Accept step one and advance
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::WrongStep`] if step two is already showing
    /// and [`DashboardError::MissingFields`] if a required value is empty.
    pub fn submit_step_one(&mut self, input: StepOneInput) -> DashboardResult<()> {
        if let WizardStep::Details(_) = self.step {
            return Err(DashboardError::WrongStep {
                expected: 1,
                current: 2,
            });
        }

        let step_one = StepOne {
            category_id: input
                .category_id
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            name: input.name,
            location: self.location_display().unwrap_or_default(),
            about: input.about,
        };

        let missing = missing_keys(&step_one.fields());
        if !missing.is_empty() {
            return Err(DashboardError::MissingFields(missing));
        }

        self.step = WizardStep::Details(step_one);
        Ok(())
    }

    /// Store a banner file and hand back its preview job
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidSlot`] past the last slot.
    pub fn attach_banner(
        &mut self,
        slot: usize,
        attachment: Attachment,
    ) -> DashboardResult<PreviewJob> {
        let slot = check_slot(slot)?;
        self.banners.insert(slot, attachment.clone());
        Ok(PreviewJob::new(slot, self.generation, attachment))
    }

    /// Apply a finished preview; stale results are dropped
    ///
    /// Returns whether the preview was applied.
    pub fn complete_preview(&mut self, ready: PreviewReady) -> bool {
        if ready.generation != self.generation {
            return false;
        }
        self.previews.insert(ready.slot, ready.data_url).is_ok()
    }

    /// Store the menu document
    pub fn attach_menu(&mut self, attachment: Attachment) {
        self.menu = Some(attachment);
    }

    /// Build the payload from step two
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::WrongStep`] on step one and
    /// [`DashboardError::MissingFields`] if an hour is empty.
    pub fn payload(&self, step_two: &StepTwo) -> DashboardResult<PlacePayload> {
        let WizardStep::Details(step_one) = &self.step else {
            return Err(DashboardError::WrongStep {
                expected: 2,
                current: 1,
            });
        };

        let missing = step_two.missing();
        if !missing.is_empty() {
            return Err(DashboardError::MissingFields(missing));
        }

        Ok(assemble(&PayloadParts {
            edit_target: self.edit_target.as_ref().map(|place| &place.id),
            step_one,
            step_two,
            rating: self.rating,
            location: self.selected_location.as_ref(),
            banners: &self.banners,
            menu: self.menu.as_ref(),
        }))
    }

    /// Record the messages of a failed save
    pub fn set_errors(&mut self, errors: Vec<String>) {
        self.errors = errors;
    }

    /// Serializable view
    #[must_use]
    pub fn view(&self) -> WizardView {
        WizardView {
            mode: if self.edit_target.is_some() { "edit" } else { "create" },
            step: self.step.number(),
            place_id: self.edit_target.as_ref().map(|place| place.id.to_string()),
            rating: self.rating,
            stars: star_row(self.rating),
            location: self.location_display(),
            banners: (0..BANNER_SLOTS)
                .map(|slot| self.banners.get(&slot).map(|file| file.file_name.clone()))
                .collect(),
            previews: self.previews.to_vec(),
            menu: self.menu.as_ref().map(|file| file.file_name.clone()),
            errors: self.errors.clone(),
        }
    }
}

/// Place form as shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    /// "create" or "edit"
    pub mode: &'static str,
    /// 1 or 2
    pub step: u8,
    /// Edited place
    pub place_id: Option<String>,
    /// Chosen rating
    pub rating: u8,
    /// Filled stars
    pub stars: [bool; STAR_COUNT],
    /// Location text
    pub location: Option<String>,
    /// Banner file names by slot
    pub banners: Vec<Option<String>>,
    /// Preview data URLs by slot
    pub previews: Vec<Option<String>>,
    /// Menu file name
    pub menu: Option<String>,
    /// Save errors
    pub errors: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step_one() -> StepOne {
        StepOne {
            category_id: "c1".to_string(),
            name: "Skyline".to_string(),
            location: "Austin, TX, USA".to_string(),
            about: "Rooftop lounge".to_string(),
        }
    }

    fn step_two() -> StepTwo {
        StepTwo {
            opening_hour: "10:00".to_string(),
            closing_hour: "22:00".to_string(),
            weekend_opening_hour: "12:00".to_string(),
            weekend_closing_hour: "02:00".to_string(),
        }
    }

    fn picked() -> SelectedLocation {
        SelectedLocation {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            country: "USA".to_string(),
            latitude: "30.2672".to_string(),
            longitude: "-97.7431".to_string(),
        }
    }

    #[test]
    fn test_assemble_create_key_order() {
        let mut banners = BTreeMap::new();
        banners.insert(2, Attachment::new("side.png", vec![2]));
        banners.insert(0, Attachment::new("front.png", vec![1]));
        let menu = Attachment::new("menu.pdf", vec![3]);
        let location = picked();
        let (one, two) = (step_one(), step_two());

        let payload = assemble(&PayloadParts {
            edit_target: None,
            step_one: &one,
            step_two: &two,
            rating: 4,
            location: Some(&location),
            banners: &banners,
            menu: Some(&menu),
        });

        assert_eq!(
            payload.keys(),
            vec![
                "category_id",
                "name",
                "location",
                "about",
                "opening_hour",
                "closing_hour",
                "weekend_opening_hour",
                "weekend_closing_hour",
                "rating",
                "city",
                "state",
                "country",
                "latitude",
                "longitude",
                "banner1",
                "banner3",
                "menu_image",
            ]
        );
        assert_eq!(payload.field("rating"), Some("4"));
        assert_eq!(payload.field("latitude"), Some("30.2672"));
    }

    #[test]
    fn test_assemble_edit_leads_with_id_and_skips_absent_parts() {
        let id = RecordId::from("p1");
        let banners = BTreeMap::new();
        let (one, two) = (step_one(), step_two());

        let payload = assemble(&PayloadParts {
            edit_target: Some(&id),
            step_one: &one,
            step_two: &two,
            rating: 0,
            location: None,
            banners: &banners,
            menu: None,
        });

        let keys = payload.keys();
        assert_eq!(keys.first(), Some(&"id"));
        assert_eq!(keys.last(), Some(&"rating"));
        assert_eq!(keys.len(), 10);
        assert_eq!(payload.field("rating"), Some("0"));
    }

    #[test]
    fn test_assemble_is_pure() {
        let banners = BTreeMap::new();
        let (one, two) = (step_one(), step_two());
        let parts = PayloadParts {
            edit_target: None,
            step_one: &one,
            step_two: &two,
            rating: 3,
            location: None,
            banners: &banners,
            menu: None,
        };

        assert_eq!(assemble(&parts), assemble(&parts));
    }

    #[test]
    fn test_rating_bounds() {
        let mut wizard = Wizard::create(1);
        assert!(matches!(wizard.set_rating(0), Err(DashboardError::InvalidRating(0))));
        assert!(matches!(wizard.set_rating(6), Err(DashboardError::InvalidRating(6))));
        wizard.set_rating(5).unwrap();
        assert_eq!(wizard.rating(), 5);
    }

    #[test]
    fn test_step_one_requires_location() {
        let mut wizard = Wizard::create(1);
        let input = StepOneInput {
            category_id: Some(RecordId::from("c1")),
            name: "Skyline".to_string(),
            about: "Rooftop lounge".to_string(),
        };

        let err = wizard.submit_step_one(input.clone()).unwrap_err();
        assert!(
            matches!(&err, DashboardError::MissingFields(keys) if keys == &["location".to_string()])
        );
        assert_eq!(wizard.step().number(), 1);

        wizard.select_location(picked()).unwrap();
        wizard.submit_step_one(input).unwrap();
        assert_eq!(wizard.step().number(), 2);
    }

    #[test]
    fn test_stale_preview_is_dropped() {
        let mut wizard = Wizard::create(3);
        let stale = PreviewReady {
            slot: 0,
            generation: 2,
            data_url: "data:x".to_string(),
        };
        let fresh = PreviewReady {
            slot: 1,
            generation: 3,
            data_url: "data:y".to_string(),
        };

        assert!(!wizard.complete_preview(stale));
        assert!(wizard.complete_preview(fresh));
        assert_eq!(wizard.previews().get(1), Some("data:y"));
        assert_eq!(wizard.previews().get(0), None);
    }

    #[test]
    fn test_payload_requires_step_two_hours() {
        let mut wizard = Wizard::create(1);
        wizard.select_location(picked()).unwrap();
        wizard
            .submit_step_one(StepOneInput {
                category_id: Some(RecordId::from("c1")),
                name: "Skyline".to_string(),
                about: "Rooftop".to_string(),
            })
            .unwrap();

        let err = wizard
            .payload(&StepTwo {
                opening_hour: "10:00".to_string(),
                ..StepTwo::default()
            })
            .unwrap_err();

        assert!(matches!(err, DashboardError::MissingFields(keys) if keys.len() == 3));
    }

    #[test]
    fn test_location_locked_after_step_one() {
        let mut wizard = Wizard::create(1);
        wizard.select_location(picked()).unwrap();
        wizard
            .submit_step_one(StepOneInput {
                category_id: Some(RecordId::from("c1")),
                name: "Skyline".to_string(),
                about: "Rooftop".to_string(),
            })
            .unwrap();

        let moved = SelectedLocation {
            city: "Boulder".to_string(),
            ..picked()
        };
        let err = wizard.select_location(moved).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::WrongStep {
                expected: 1,
                current: 2
            }
        ));

        let payload = wizard.payload(&step_two()).unwrap();
        assert_eq!(payload.field("city"), Some("Austin"));
        assert_eq!(payload.field("location"), Some("Austin, TX, USA"));
    }
}
