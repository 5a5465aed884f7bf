//! Core types and utilities for the concierge admin console

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{ApiConfig, Config, DashboardConfig, LoggingConfig};
pub use error::{Error, Result};
pub use types::{
    Attachment, Booking, BookingDetail, Category, Match, MatchUser, Participant, Place,
    RecordId, SelectedLocation,
};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level; `override_level` (from the
/// command line) wins over both.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(logging: &LoggingConfig, override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match override_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level)),
    }
    .map_err(|e| Error::configuration(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| Error::Other(format!("failed to install logger: {e}")))
}
