//! Screen controllers
//!
//! Each screen owns its view state and talks to the admin API through the
//! [`ScreenContext`](crate::ScreenContext). Actions take `&mut self`, so a
//! response can only land on the screen that issued the request.

pub mod bonded;
pub mod date_detail;
pub mod dates;
pub mod places;
pub mod previews;
pub mod wizard;

pub use bonded::{BondedRow, BondedScreen, BondedView};
pub use date_detail::{DateDetail, DateDetailScreen, DateDetailView};
pub use dates::{DateRow, DatesScreen, DatesView};
pub use places::{CategoryChoice, PlaceCard, PlacesScreen, PlacesView};
pub use previews::{BANNER_SLOTS, PreviewJob, PreviewReady, PreviewSlots};
pub use wizard::{StepOneInput, StepTwo, Wizard, WizardStep, WizardView};
