//! Place catalog: cards, action sheet, place wizard and category sub-form

use crate::context::ScreenContext;
use crate::error::{DashboardError, DashboardResult};
use crate::screens::previews::{PreviewJob, PreviewReady};
use crate::screens::wizard::{StepOneInput, StepTwo, Wizard, WizardView};
use crate::state::{ActionOutcome, BlockingError, Body, NotificationView, Notifier, Phase};
use concierge_client::{ClientError, NewCategory};
use concierge_core::types::{Attachment, Category, Place, RecordId, SelectedLocation};
use concierge_core::utils::photo_or_placeholder;
use serde::Serialize;
use tracing::{info, warn};

/// Blocking message when places cannot be fetched
pub const PLACES_FAILED: &str = "Failed to load places";
/// Notice when categories cannot be fetched
pub const CATEGORIES_FAILED: &str = "Failed to load categories";
/// Notice when a delete fails
pub const DELETE_FAILED: &str = "Failed to delete place";
/// Notice when category creation fails
pub const CATEGORY_FAILED: &str = "Failed to create category";
/// Form error when a save fails without server messages
pub const SAVE_FAILED: &str = "An unexpected error occurred. Please try again.";
/// Empty state
pub const EMPTY_STATE: &str = "No places yet";
/// Label of the select option that opens the category sub-form
pub const CREATE_CATEGORY_OPTION: &str = "+ Create new category";

/// Category select choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
    /// An existing category
    Existing(RecordId),
    /// The "create new category" option
    CreateNew,
}

/// Place card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceCard {
    /// Place id
    pub id: String,
    /// Banner or placeholder
    pub banner: String,
    /// Venue name
    pub name: String,
    /// "city, state"
    pub location: String,
}

/// Action sheet for one place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSheetView {
    /// Place id
    pub place_id: String,
    /// Place name
    pub place_name: String,
    /// Offered actions
    pub actions: [&'static str; 2],
}

/// Category select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    /// Option value, `None` for the create-new option
    pub id: Option<String>,
    /// Option label
    pub label: String,
}

/// Everything the places screen shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacesView {
    /// Whether a request is in flight
    pub loading: bool,
    /// Cards or replacement
    pub body: Body<Vec<PlaceCard>>,
    /// Open action sheet
    pub action_sheet: Option<ActionSheetView>,
    /// Open place form
    pub wizard: Option<WizardView>,
    /// Category select options
    pub categories: Vec<CategoryOption>,
    /// Whether the category sub-form is open
    pub category_form_open: bool,
    /// Transient notice
    pub notification: Option<NotificationView>,
}

/// Place catalog screen
#[derive(Debug)]
pub struct PlacesScreen {
    ctx: ScreenContext,
    phase: Phase,
    loaded: bool,
    places: Vec<Place>,
    categories: Vec<Category>,
    notifier: Notifier,
    action_sheet: Option<RecordId>,
    wizard: Option<Wizard>,
    category_form_open: bool,
    generation: u64,
}

impl PlacesScreen {
    /// Create an unmounted screen
    #[must_use]
    pub fn new(ctx: ScreenContext) -> Self {
        let notifier = ctx.notifier();
        Self {
            ctx,
            phase: Phase::Idle,
            loaded: false,
            places: Vec::new(),
            categories: Vec::new(),
            notifier,
            action_sheet: None,
            wizard: None,
            category_form_open: false,
            generation: 0,
        }
    }

    /// Fetch places and categories independently
    #[tracing::instrument(skip(self))]
    pub async fn mount(&mut self) {
        let previous = std::mem::replace(&mut self.phase, Phase::Loading);
        let api = self.ctx.api();
        let (places, categories) = futures::join!(api.list_places(), api.list_categories());

        match places {
            Ok(places) => {
                info!(count = places.len(), "places loaded");
                self.places = places;
                self.loaded = true;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to load places");
                self.places.clear();
                self.loaded = false;
                self.phase = Phase::Failed(BlockingError::new(PLACES_FAILED));
            }
        }
        self.apply_categories(categories);
    }

    async fn refresh_places(&mut self) {
        match self.ctx.api().list_places().await {
            Ok(places) => {
                self.places = places;
                self.loaded = true;
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh places");
                self.notifier.error(PLACES_FAILED);
            }
        }
    }

    async fn refresh_categories(&mut self) {
        let categories = self.ctx.api().list_categories().await;
        self.apply_categories(categories);
    }

    fn apply_categories(&mut self, categories: Result<Vec<Category>, ClientError>) {
        match categories {
            Ok(categories) => {
                info!(count = categories.len(), "categories loaded");
                self.categories = categories;
            }
            Err(e) => {
                warn!(error = %e, "failed to load categories");
                self.notifier.error(CATEGORIES_FAILED);
            }
        }
    }

    fn find_place(&self, id: &RecordId) -> DashboardResult<&Place> {
        self.places
            .iter()
            .find(|place| &place.id == id)
            .ok_or_else(|| DashboardError::UnknownRecord {
                kind: "place",
                id: id.to_string(),
            })
    }

    /// Phase after a mutation: ready once places were read, otherwise the
    /// phase the mutation started from
    fn settle(&mut self, previous: Phase) {
        self.phase = if self.loaded { Phase::Ready } else { previous };
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    // Action sheet

    /// Open the Edit/Delete sheet for a place
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownRecord`] if the place is not listed.
    pub fn open_actions(&mut self, id: &RecordId) -> DashboardResult<()> {
        self.find_place(id)?;
        self.action_sheet = Some(id.clone());
        Ok(())
    }

    /// Close the sheet without acting
    pub fn close_actions(&mut self) {
        self.action_sheet = None;
    }

    fn sheet_target(&self) -> DashboardResult<RecordId> {
        self.action_sheet
            .clone()
            .ok_or(DashboardError::NoActiveForm {
                form: "action sheet",
            })
    }

    /// "Edit" from the sheet: open the wizard on the place
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] without an open sheet.
    pub fn choose_edit(&mut self) -> DashboardResult<StepOneInput> {
        let id = self.sheet_target()?;
        let place = self.find_place(&id)?.clone();
        let generation = self.next_generation();
        let wizard = Wizard::edit(place, generation);
        let input = wizard.initial_input();
        self.wizard = Some(wizard);
        self.action_sheet = None;
        Ok(input)
    }

    /// "Delete" from the sheet, the confirmation step of a delete
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] without an open sheet.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_delete(&mut self) -> DashboardResult<ActionOutcome> {
        let id = self.sheet_target()?;
        let previous = std::mem::replace(&mut self.phase, Phase::Loading);

        let outcome = match self.ctx.api().delete_place(&id).await {
            Ok(()) => {
                info!(%id, "place deleted");
                self.refresh_places().await;
                self.action_sheet = None;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                self.notifier.error(DELETE_FAILED);
                ActionOutcome::Failed
            }
        };

        self.settle(previous);
        Ok(outcome)
    }

    // Place wizard

    /// Open an empty wizard for a new place
    pub fn open_create(&mut self) {
        let generation = self.next_generation();
        self.wizard = Some(Wizard::create(generation));
    }

    /// Close the wizard, discarding its state
    pub fn cancel_wizard(&mut self) {
        self.wizard = None;
    }

    fn wizard_mut(&mut self) -> DashboardResult<&mut Wizard> {
        self.wizard
            .as_mut()
            .ok_or(DashboardError::NoActiveForm { form: "place form" })
    }

    /// Open wizard, if any
    #[must_use]
    pub const fn wizard(&self) -> Option<&Wizard> {
        self.wizard.as_ref()
    }

    /// Handle the category select
    ///
    /// An existing category is returned for the step-one input. The create-new
    /// option opens the category sub-form and returns `None`; step-one values
    /// are left as they were.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] without an open wizard and
    /// [`DashboardError::UnknownRecord`] for a category not in the list.
    pub fn choose_category(&mut self, choice: CategoryChoice) -> DashboardResult<Option<RecordId>> {
        self.wizard_mut()?;
        match choice {
            CategoryChoice::Existing(id) => {
                if !self.categories.iter().any(|category| category.id == id) {
                    return Err(DashboardError::UnknownRecord {
                        kind: "category",
                        id: id.to_string(),
                    });
                }
                Ok(Some(id))
            }
            CategoryChoice::CreateNew => {
                self.category_form_open = true;
                Ok(None)
            }
        }
    }

    /// Choose a star
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRating`] outside 1..=5.
    pub fn set_rating(&mut self, rating: u8) -> DashboardResult<()> {
        self.wizard_mut()?.set_rating(rating)
    }

    /// Location picker callback
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] without an open wizard and
    /// [`DashboardError::WrongStep`] once step one was accepted.
    pub fn on_location_selected(&mut self, location: SelectedLocation) -> DashboardResult<()> {
        self.wizard_mut()?.select_location(location)
    }

    /// Accept step one
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingFields`] and stays on step one if a
    /// required value is empty.
    pub fn submit_step_one(&mut self, input: StepOneInput) -> DashboardResult<()> {
        self.wizard_mut()?.submit_step_one(input)
    }

    /// Attach a banner; the returned job fills its preview when run
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidSlot`] past the last slot.
    pub fn attach_banner(
        &mut self,
        slot: usize,
        attachment: Attachment,
    ) -> DashboardResult<PreviewJob> {
        self.wizard_mut()?.attach_banner(slot, attachment)
    }

    /// Apply a finished preview; returns whether it was applied
    pub fn complete_preview(&mut self, ready: PreviewReady) -> bool {
        self.wizard
            .as_mut()
            .is_some_and(|wizard| wizard.complete_preview(ready))
    }

    /// Attach the menu document
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] without an open wizard.
    pub fn attach_menu(&mut self, attachment: Attachment) -> DashboardResult<()> {
        self.wizard_mut()?.attach_menu(attachment);
        Ok(())
    }

    /// Submit step two: one multipart write, then re-read places
    ///
    /// On failure the wizard stays on step two with the server's messages.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`], [`DashboardError::WrongStep`]
    /// or [`DashboardError::MissingFields`] before any request is made.
    #[tracing::instrument(skip(self, step_two))]
    pub async fn submit_details(&mut self, step_two: &StepTwo) -> DashboardResult<ActionOutcome> {
        let wizard = self.wizard_mut()?;
        let payload = wizard.payload(step_two)?;
        let editing = wizard.edit_target().is_some();
        wizard.set_errors(Vec::new());

        let previous = std::mem::replace(&mut self.phase, Phase::Loading);
        let api = self.ctx.api();
        let result = if editing {
            api.edit_place(&payload).await
        } else {
            api.create_place(&payload).await
        };

        let outcome = match result {
            Ok(()) => {
                info!(editing, "place saved");
                self.refresh_places().await;
                self.wizard = None;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(editing, error = %e, "place save failed");
                let messages = match e.server_messages() {
                    [] => vec![SAVE_FAILED.to_string()],
                    messages => messages.to_vec(),
                };
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.set_errors(messages);
                }
                ActionOutcome::Failed
            }
        };

        self.settle(previous);
        Ok(outcome)
    }

    // Category sub-form

    /// Open the category sub-form directly
    pub fn open_category_form(&mut self) {
        self.category_form_open = true;
    }

    /// Close the category sub-form
    pub fn cancel_category(&mut self) {
        self.category_form_open = false;
    }

    /// Whether the category sub-form is open
    #[must_use]
    pub const fn category_form_open(&self) -> bool {
        self.category_form_open
    }

    /// Create a category, re-read categories and close only the sub-form
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveForm`] if the sub-form is closed.
    #[tracing::instrument(skip(self))]
    pub async fn submit_category(&mut self, name: &str) -> DashboardResult<ActionOutcome> {
        if !self.category_form_open {
            return Err(DashboardError::NoActiveForm {
                form: "category form",
            });
        }

        let previous = std::mem::replace(&mut self.phase, Phase::Loading);
        let request = NewCategory {
            name: name.to_string(),
        };

        let outcome = match self.ctx.api().create_category(&request).await {
            Ok(()) => {
                info!(name, "category created");
                self.refresh_categories().await;
                self.category_form_open = false;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(name, error = %e, "category creation failed");
                self.notifier.error(CATEGORY_FAILED);
                ActionOutcome::Failed
            }
        };

        self.settle(previous);
        Ok(outcome)
    }

    // Views

    /// Current load phase
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Notice holder, for dismissal
    pub const fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Categories from the last successful read
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Cards derived from the last successful read
    #[must_use]
    pub fn cards(&self) -> Vec<PlaceCard> {
        let placeholder = &self.ctx.settings().placeholder_image;
        self.places
            .iter()
            .map(|place| PlaceCard {
                id: place.id.to_string(),
                banner: photo_or_placeholder(place.banner.as_deref(), placeholder),
                name: place.name.clone(),
                location: format!("{}, {}", place.location.city, place.location.state),
            })
            .collect()
    }

    /// Select options: every category, then the create-new option
    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryOption> {
        self.categories
            .iter()
            .map(|category| CategoryOption {
                id: Some(category.id.to_string()),
                label: category.name.clone(),
            })
            .chain(std::iter::once(CategoryOption {
                id: None,
                label: CREATE_CATEGORY_OPTION.to_string(),
            }))
            .collect()
    }

    /// Full view model
    #[must_use]
    pub fn view(&self) -> PlacesView {
        let action_sheet = self.action_sheet.as_ref().and_then(|id| {
            self.find_place(id).ok().map(|place| ActionSheetView {
                place_id: place.id.to_string(),
                place_name: place.name.clone(),
                actions: ["Edit", "Delete"],
            })
        });

        PlacesView {
            loading: self.phase.is_loading(),
            body: Body::for_list(
                &self.phase,
                self.loaded,
                self.cards(),
                self.places.is_empty(),
                EMPTY_STATE,
            ),
            action_sheet,
            wizard: self.wizard.as_ref().map(Wizard::view),
            categories: self.category_options(),
            category_form_open: self.category_form_open,
            notification: self.notifier.view(),
        }
    }
}
