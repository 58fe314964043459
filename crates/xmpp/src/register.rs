//! Account registration through the `xmpp-register` action.

use {
    boxpanel_actions::ActionRunner,
    boxpanel_web::Messages,
    tracing::{info, warn},
};

use crate::error::{Error, Result};

pub const REGISTER_ACTION: &str = "xmpp-register";

const SUCCESS_MARKER: &str = "successfully registered";

/// Register `username` on the local XMPP server.
///
/// Returns whether the tool reported success. Both outcomes are recorded in
/// `messages`; only a failing command is an error.
pub async fn register_user(
    runner: &dyn ActionRunner,
    username: &str,
    password: &str,
    messages: &mut Messages,
) -> Result<bool> {
    info!(username, "registering xmpp account");

    let out = runner
        .superuser_run(REGISTER_ACTION, &[username, password])
        .await
        .map_err(|e| Error::Register {
            message: e.to_string(),
        })?;
    if let Some(message) = out.error {
        return Err(Error::Register { message });
    }

    if out.output.contains(SUCCESS_MARKER) {
        messages.success(format!("Registered account for {username}"));
        Ok(true)
    } else {
        warn!(username, output = %out.output.trim(), "xmpp registration refused");
        messages.error(format!(
            "Failed to register account for {username}: {}",
            out.output
        ));
        Ok(false)
    }
}
