//! Common test utilities and fixtures for dashboard integration tests

#![allow(dead_code)]

use concierge_client::MockAdminApi;
use concierge_core::config::DashboardConfig;
use concierge_dashboard::ScreenContext;
use std::sync::Arc;

pub mod fixtures;

pub use fixtures::*;

/// Screen context backed by a shared mock, so tests can inspect its state
pub fn context(api: &Arc<MockAdminApi>) -> ScreenContext {
    ScreenContext::new(api.clone(), DashboardConfig::default())
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("concierge=debug")
        .with_test_writer()
        .try_init();
}
