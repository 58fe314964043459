//! In-band registration status and the `xmpp-setup` action.

use {
    boxpanel_actions::ActionRunner,
    boxpanel_web::Messages,
    tracing::{debug, info},
};

use crate::error::{Error, Result};

pub const SETUP_ACTION: &str = "xmpp-setup";

const INBAND_TOKEN: &str = "inband_enable";

/// Current XMPP server settings as reported by `xmpp-setup status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmppStatus {
    pub inband_enabled: bool,
}

impl XmppStatus {
    /// Enabled iff the exact token `inband_enable` is among the
    /// whitespace-separated words of `output`.
    pub fn parse(output: &str) -> Self {
        Self {
            inband_enabled: output.split_whitespace().any(|t| t == INBAND_TOKEN),
        }
    }
}

impl std::fmt::Display for XmppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inband_enabled={}", self.inband_enabled)
    }
}

/// Argument passed to `xmpp-setup` to change in-band registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InbandOption {
    Enable,
    Disable,
}

impl InbandOption {
    pub fn for_enabled(enabled: bool) -> Self {
        if enabled { Self::Enable } else { Self::Disable }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enable => "inband_enable",
            Self::Disable => "noinband_enable",
        }
    }
}

impl std::fmt::Display for InbandOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query the server through the unprivileged `xmpp-setup status`.
pub async fn get_status(runner: &dyn ActionRunner) -> Result<XmppStatus> {
    let out = runner
        .run(SETUP_ACTION, &["status"])
        .await
        .map_err(|e| Error::Status {
            message: e.to_string(),
        })?;
    if let Some(message) = out.error {
        return Err(Error::Status { message });
    }

    let status = XmppStatus::parse(&out.output);
    debug!(%status, "xmpp status");
    Ok(status)
}

/// Run the privileged `xmpp-setup <option>`.
pub async fn set_inband(runner: &dyn ActionRunner, option: InbandOption) -> Result<()> {
    let out = runner
        .superuser_run(SETUP_ACTION, &[option.as_str()])
        .await
        .map_err(|e| Error::Setup {
            message: e.to_string(),
        })?;
    match out.error {
        Some(message) => Err(Error::Setup { message }),
        None => Ok(()),
    }
}

/// Compare the submitted settings against the current ones and apply the
/// difference, recording the outcome in `messages`.
///
/// The success message is pushed before the command runs; a failing command
/// aborts the request so the message is never shown.
pub async fn apply_changes(
    runner: &dyn ActionRunner,
    old: XmppStatus,
    new: XmppStatus,
    messages: &mut Messages,
) -> Result<()> {
    info!(old = %old, new = %new, "applying xmpp settings");

    if old.inband_enabled == new.inband_enabled {
        messages.info("Setting unchanged");
        return Ok(());
    }

    let option = InbandOption::for_enabled(new.inband_enabled);
    match option {
        InbandOption::Enable => messages.success("Inband registration enabled"),
        InbandOption::Disable => messages.success("Inband registration disabled"),
    }

    info!(%option, "changing in-band registration");
    set_inband(runner, option).await
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        boxpanel_actions::{ActionOutput, ScriptedRunner},
        boxpanel_web::Severity,
        rstest::rstest,
    };

    fn enabled(inband_enabled: bool) -> XmppStatus {
        XmppStatus { inband_enabled }
    }

    #[rstest]
    #[case("inband_enable", true)]
    #[case("other_flag inband_enable", true)]
    #[case("  inband_enable\n", true)]
    #[case("other_flag", false)]
    #[case("noinband_enable", false)]
    #[case("inband_enabled", false)]
    #[case("", false)]
    fn parses_status(#[case] output: &str, #[case] expected: bool) {
        assert_eq!(XmppStatus::parse(output).inband_enabled, expected);
    }

    #[tokio::test]
    async fn get_status_runs_unprivileged() {
        let runner = ScriptedRunner::new(|_| ActionOutput::ok("inband_enable\n"));
        assert_eq!(get_status(&runner).await.unwrap(), enabled(true));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, "xmpp-setup");
        assert_eq!(calls[0].args, vec!["status"]);
        assert!(!calls[0].privileged);
    }

    #[tokio::test]
    async fn get_status_error_is_fatal() {
        let runner = ScriptedRunner::new(|_| ActionOutput::failed("ejabberd not running"));
        let err = get_status(&runner).await.unwrap_err();
        assert_eq!(err.to_string(), "Error getting status: ejabberd not running");
    }

    #[tokio::test]
    async fn unchanged_setting_runs_nothing() {
        let runner = ScriptedRunner::new(|_| ActionOutput::ok(""));
        let mut messages = Messages::new();

        apply_changes(&runner, enabled(true), enabled(true), &mut messages)
            .await
            .unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages.count(Severity::Info), 1);
        assert_eq!(messages.as_slice()[0].text, "Setting unchanged");
        assert!(runner.calls().is_empty());
    }

    #[rstest]
    #[case(false, true, "inband_enable", "Inband registration enabled")]
    #[case(true, false, "noinband_enable", "Inband registration disabled")]
    #[tokio::test]
    async fn changed_setting_runs_one_command(
        #[case] old: bool,
        #[case] new: bool,
        #[case] option: &str,
        #[case] text: &str,
    ) {
        let runner = ScriptedRunner::new(|_| ActionOutput::ok(""));
        let mut messages = Messages::new();

        apply_changes(&runner, enabled(old), enabled(new), &mut messages)
            .await
            .unwrap();

        let calls = runner.privileged_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, "xmpp-setup");
        assert_eq!(calls[0].args, vec![option]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages.count(Severity::Success), 1);
        assert_eq!(messages.as_slice()[0].text, text);
    }

    #[tokio::test]
    async fn failing_setup_command_is_fatal() {
        let runner = ScriptedRunner::new(|_| ActionOutput::failed("permission denied"));
        let mut messages = Messages::new();

        let err = apply_changes(&runner, enabled(false), enabled(true), &mut messages)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error running command - permission denied");
    }
}
