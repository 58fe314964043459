//! XMPP server app: landing page, in-band registration settings and account
//! registration, all backed by the `xmpp-setup` and `xmpp-register` actions.

pub mod error;
pub mod forms;
pub mod pages;
pub mod register;
pub mod status;

use {
    axum::{Router, routing::get},
    boxpanel_services::{Service, ServiceRegistry},
    boxpanel_web::{AppState, MenuItem, PagePlugin},
};

pub use {
    error::{Error, Result},
    forms::{ConfigureForm, RegisterForm},
    register::register_user,
    status::{InbandOption, XmppStatus, apply_changes, get_status, set_inband},
};

// ── Plugins ──────────────────────────────────────────────────────────────────

/// Landing page. Owns the "XMPP" entry in the Apps menu and the XMPP
/// services.
#[derive(Debug, Default)]
pub struct XmppPlugin;

impl PagePlugin for XmppPlugin {
    fn name(&self) -> &'static str {
        "apps.xmpp"
    }

    fn order(&self) -> i32 {
        60
    }

    fn routes(&self) -> Router<AppState> {
        Router::new().route(pages::INDEX_URL, get(pages::index_handler))
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        vec![
            MenuItem::new("XMPP", pages::INDEX_URL)
                .icon("icon-comment")
                .order(40),
        ]
    }

    fn register_services(&self, services: &ServiceRegistry) {
        for service in services_list() {
            services.register(service);
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigurePlugin;

impl PagePlugin for ConfigurePlugin {
    fn name(&self) -> &'static str {
        "apps.xmpp.configure"
    }

    fn order(&self) -> i32 {
        65
    }

    fn routes(&self) -> Router<AppState> {
        Router::new().route(
            pages::CONFIGURE_URL,
            get(pages::configure_get_handler).post(pages::configure_post_handler),
        )
    }
}

#[derive(Debug, Default)]
pub struct RegisterPlugin;

impl PagePlugin for RegisterPlugin {
    fn name(&self) -> &'static str {
        "apps.xmpp.register"
    }

    fn order(&self) -> i32 {
        65
    }

    fn routes(&self) -> Router<AppState> {
        Router::new().route(
            pages::REGISTER_URL,
            get(pages::register_get_handler).post(pages::register_post_handler),
        )
    }
}

/// Every XMPP page plugin, ready for a [`boxpanel_web::PluginRegistry`].
pub fn plugins() -> Vec<Box<dyn PagePlugin>> {
    vec![
        Box::new(XmppPlugin),
        Box::new(ConfigurePlugin),
        Box::new(RegisterPlugin),
    ]
}

/// Externally reachable services run by the XMPP server.
pub fn services_list() -> Vec<Service> {
    vec![
        Service::new("xmpp-client", "Chat Server - client connections", true, true),
        Service::new("xmpp-server", "Chat Server - server connections", true, true),
        Service::new("xmpp-bosh", "Chat Server - web interface", true, true),
    ]
}
