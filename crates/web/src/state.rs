use std::sync::Arc;

use {
    boxpanel_actions::ActionRunner,
    boxpanel_config::BoxpanelConfig,
    boxpanel_services::ServiceRegistry,
};

use crate::menu::Menu;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BoxpanelConfig>,
    pub runner: Arc<dyn ActionRunner>,
    pub services: Arc<ServiceRegistry>,
    /// Main "Apps" menu collected from the mounted plugins.
    pub apps_menu: Arc<Menu>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("services", &self.services)
            .field("apps_menu", &self.apps_menu)
            .finish_non_exhaustive()
    }
}
