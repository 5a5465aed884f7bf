//! Admin dashboard screens for the concierge platform
//!
//! Four screens are provided: bonded matches with the notify action, the
//! pending dates list, a single date's detail, and the place catalog with its
//! two-step place form and category sub-form. Each screen is a controller that
//! owns its view state and produces a serializable view model; the
//! `concierge-admin` binary renders those views as terminal text or JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use concierge_client::MockAdminApi;
//! use concierge_core::config::DashboardConfig;
//! use concierge_dashboard::{BondedScreen, Render, ScreenContext};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let ctx = ScreenContext::new(Arc::new(MockAdminApi::new()), DashboardConfig::default());
//! let mut screen = BondedScreen::new(ctx);
//! screen.mount().await;
//! println!("{}", screen.view().render());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod render;
pub mod screens;
pub mod state;

// Re-export main types
pub use context::ScreenContext;
pub use error::{DashboardError, DashboardResult};
pub use render::Render;
pub use screens::{
    BondedScreen, CategoryChoice, DateDetailScreen, DatesScreen, PlacesScreen, StepOneInput,
    StepTwo,
};
pub use state::{
    ActionOutcome, BlockingError, Body, DismissReason, Notification, NotificationView, Notifier,
    Phase, Severity,
};
