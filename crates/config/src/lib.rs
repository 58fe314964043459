//! Configuration loading, validation, and env substitution.
//!
//! Config files: `boxpanel.toml`, `boxpanel.yaml`, or `boxpanel.json`
//! Searched in `./` then `~/.config/boxpanel/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod template;
pub mod validate;

pub use {
    loader::{
        config_dir, discover_and_load, find_config_file, find_or_default_config_path,
        load_config, write_default_config,
    },
    schema::{
        ActionsConfig, AuthConfig, BoxpanelConfig, ServerConfig, XmppConfig, is_loopback_addr,
    },
    validate::{Diagnostic, Severity, ValidationResult},
};
