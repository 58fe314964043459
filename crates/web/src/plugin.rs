//! Page plugins and the route table they are mounted into.
//!
//! Plugins are added explicitly at startup. The registry orders them, merges
//! their routers, and collects their entries for the main "Apps" menu.

use {axum::Router, boxpanel_services::ServiceRegistry, tracing::{debug, warn}};

use crate::{
    menu::{Menu, MenuItem},
    state::AppState,
};

pub const APPS_MENU_TITLE: &str = "Apps";

/// A unit exposing one or more URL-routed pages.
pub trait PagePlugin: Send + Sync {
    /// Unique name, e.g. `apps.xmpp.configure`.
    fn name(&self) -> &'static str;

    /// Mount order; lower mounts first.
    fn order(&self) -> i32;

    fn routes(&self) -> Router<AppState>;

    /// Entries contributed to the main "Apps" menu.
    fn menu_items(&self) -> Vec<MenuItem> {
        Vec::new()
    }

    /// Announce background services this plugin's app runs on the host.
    fn register_services(&self, _services: &ServiceRegistry) {}
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn PagePlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. A second plugin with an already registered name is
    /// ignored.
    pub fn add(&mut self, plugin: Box<dyn PagePlugin>) {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            warn!(name = plugin.name(), "page plugin already registered, ignoring");
            return;
        }
        debug!(name = plugin.name(), order = plugin.order(), "adding page plugin");
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.order());
    }

    pub fn extend(&mut self, plugins: impl IntoIterator<Item = Box<dyn PagePlugin>>) {
        for plugin in plugins {
            self.add(plugin);
        }
    }

    /// Plugin names in mount order.
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn register_services(&self, services: &ServiceRegistry) {
        for plugin in &self.plugins {
            plugin.register_services(services);
        }
    }

    pub fn apps_menu(&self) -> Menu {
        self.plugins
            .iter()
            .flat_map(|p| p.menu_items())
            .fold(Menu::new(APPS_MENU_TITLE), Menu::with_item)
    }

    /// Merge every plugin's routes into one router.
    pub fn routes(&self) -> Router<AppState> {
        self.plugins
            .iter()
            .fold(Router::new(), |router, plugin| router.merge(plugin.routes()))
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}
