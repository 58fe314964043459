/// Config schema types (server, auth, actions, apps).
use std::{net::IpAddr, path::PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxpanelConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub actions: ActionsConfig,
    pub xmpp: XmppConfig,
}

/// Panel HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on. Defaults to 8000.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl BoxpanelConfig {
    /// Whether panel pages demand credentials.
    ///
    /// Open access needs either `auth.disabled` or a loopback bind without a
    /// password. A non-loopback bind without a password rejects everything.
    pub fn auth_required(&self) -> bool {
        !self.auth.disabled && (self.auth.has_password() || !self.server.is_loopback())
    }
}

impl ServerConfig {
    pub fn is_loopback(&self) -> bool {
        is_loopback_addr(&self.bind)
    }
}

/// Admin authentication for every page behind the auth gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Skip authentication entirely.
    pub disabled: bool,
    pub username: String,
    /// Admin password. When unset, a loopback panel is open and any other
    /// bind refuses every request.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<Secret<String>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            username: "admin".into(),
            password: None,
        }
    }
}

impl AuthConfig {
    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }
}

/// Where setup scripts live and how privileged ones are launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub dir: PathBuf,
    /// Command prefix for privileged actions, e.g. `["sudo", "-n"]`.
    pub superuser_command: Vec<String>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/usr/share/boxpanel/actions"),
            superuser_command: vec!["sudo".into(), "-n".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XmppConfig {
    /// Mount the XMPP pages and register its services.
    pub enabled: bool,
}

impl Default for XmppConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Returns true if the given address is a loopback address.
pub fn is_loopback_addr(addr: &str) -> bool {
    match addr {
        "localhost" | "127.0.0.1" | "::1" => true,
        other => other.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback()),
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
