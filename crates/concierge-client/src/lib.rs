//! Admin API client for the concierge platform
//!
//! The [`AdminApi`] trait is the single seam between the dashboard screens and
//! the remote backend. [`HttpAdminApi`] talks to the real server over HTTP,
//! [`MockAdminApi`] keeps everything in memory for tests and demos.
//!
//! # Example
//!
//! ```rust,no_run
//! use concierge_client::{AdminApi, HttpAdminApi};
//! use concierge_core::config::ApiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpAdminApi::new(&ApiConfig::default())?;
//! let places = api.list_places().await?;
//! println!("{} places", places.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod mock;
pub mod service;

// Re-export main types
pub use error::{ClientError, ClientResult};
pub use http::HttpAdminApi;
pub use mock::{ApiCall, CallBody, MockAdminApi, MockFailure};
pub use service::{AdminApi, NewCategory, NotifyRequest, Operation, PlacePayload};
