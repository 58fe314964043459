//! Default configuration template with every option documented.
//!
//! Written by `boxpanel config init`.

pub fn default_config_template() -> String {
    r##"# boxpanel configuration
# ======================
# Changes require a restart to take effect.
#
# Environment variable substitution is supported: ${ENV_VAR} or ${ENV_VAR:-fallback}
# Example: password = "${BOXPANEL_PASSWORD}"

[server]
bind = "127.0.0.1"                # Address to bind to ("0.0.0.0" for all interfaces)
port = 8000                       # Port number

[auth]
disabled = false                  # true = no login prompt at all (DANGEROUS if exposed)
username = "admin"                # HTTP Basic username
# password = "${BOXPANEL_PASSWORD}"  # Without a password every request is let through

[actions]
dir = "/usr/share/boxpanel/actions"     # Directory holding xmpp-setup, xmpp-register, ...
superuser_command = ["sudo", "-n"]      # Prefix for privileged actions

[xmpp]
enabled = true                    # Mount the XMPP pages under /apps/xmpp
"##
    .to_string()
}
