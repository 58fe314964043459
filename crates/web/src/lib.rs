//! Web framework for the admin panel: page plugins, forms, result messages,
//! menus, and the shared layout.
//!
//! Apps implement [`PagePlugin`] and are added to a [`PluginRegistry`] at
//! startup. [`build_app`] turns the registry into an Axum router with
//! authentication applied to every plugin page.

pub mod auth_middleware;
pub mod error;
pub mod forms;
pub mod menu;
pub mod messages;
pub mod plugin;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

use std::sync::Arc;

use {
    axum::{Router, routing::get},
    boxpanel_actions::ActionRunner,
    boxpanel_config::BoxpanelConfig,
    boxpanel_services::ServiceRegistry,
    tower_http::trace::TraceLayer,
    tracing::{info, warn},
};

pub use {
    error::{Error, Result},
    forms::{BoundForm, CleanedData, FieldKind, FieldSpec, FieldValue, Form},
    menu::{Menu, MenuItem},
    messages::{Message, Messages, Severity},
    plugin::{PagePlugin, PluginRegistry},
    server::serve,
    state::AppState,
    templates::{Page, render_page},
};

/// Assemble the panel router from the configured plugins.
pub fn build_app(
    config: BoxpanelConfig,
    runner: Arc<dyn ActionRunner>,
    plugins: &PluginRegistry,
) -> Router {
    let services = Arc::new(ServiceRegistry::new());
    plugins.register_services(&services);

    let state = AppState {
        config: Arc::new(config),
        runner,
        services,
        apps_menu: Arc::new(plugins.apps_menu()),
    };

    if !state.config.auth_required() {
        info!("panel authentication is not enforced");
    } else if !state.config.auth.has_password() {
        warn!(
            bind = %state.config.server.bind,
            "no admin password set, every page will be refused"
        );
    }
    info!(plugins = ?plugins.names(), "mounting page plugins");

    let protected = Router::new()
        .route("/", get(routes::root_handler))
        .route("/apps", get(routes::apps_handler))
        .route("/api/services", get(routes::services_handler))
        .merge(plugins.routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
