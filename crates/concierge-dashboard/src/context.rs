//! Collaborators injected into every screen

use crate::state::Notifier;
use concierge_client::AdminApi;
use concierge_core::config::DashboardConfig;
use std::sync::Arc;

/// Admin API handle plus presentation settings
#[derive(Clone)]
pub struct ScreenContext {
    api: Arc<dyn AdminApi>,
    settings: DashboardConfig,
}

impl std::fmt::Debug for ScreenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenContext")
            .field("api", &self.api.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ScreenContext {
    /// Create a context
    pub fn new(api: Arc<dyn AdminApi>, settings: DashboardConfig) -> Self {
        Self { api, settings }
    }

    /// The admin API
    #[must_use]
    pub fn api(&self) -> &dyn AdminApi {
        self.api.as_ref()
    }

    /// Presentation settings
    #[must_use]
    pub const fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    /// Fresh notifier using the configured auto-hide duration
    #[must_use]
    pub const fn notifier(&self) -> Notifier {
        Notifier::new(self.settings.notification_duration())
    }
}
