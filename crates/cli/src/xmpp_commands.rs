//! CLI subcommands driving the same XMPP actions as the web pages.

use std::collections::HashMap;

use {anyhow::Result, clap::Subcommand};

use {
    boxpanel_actions::CliActionRunner,
    boxpanel_config::BoxpanelConfig,
    boxpanel_web::{Form, Messages, Severity},
    boxpanel_xmpp::{RegisterForm, XmppStatus, apply_changes, get_status, register_user},
};

#[derive(Subcommand)]
pub enum XmppAction {
    /// Show whether in-band registration is enabled.
    Status,
    /// Allow anyone who can reach the server to register an account.
    EnableInband,
    /// Only allow accounts created by the administrator.
    DisableInband,
    /// Register an account on the local XMPP server.
    Register {
        username: String,
        #[arg(long, env = "BOXPANEL_XMPP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

pub async fn handle_xmpp(action: XmppAction, config: &BoxpanelConfig) -> Result<()> {
    let runner = CliActionRunner::from_config(&config.actions);
    let mut messages = Messages::new();

    match action {
        XmppAction::Status => {
            let status = get_status(&runner).await?;
            let state = if status.inband_enabled {
                "enabled"
            } else {
                "disabled"
            };
            println!("In-band registration: {state}");
            return Ok(());
        },
        XmppAction::EnableInband => set_inband(&runner, true, &mut messages).await?,
        XmppAction::DisableInband => set_inband(&runner, false, &mut messages).await?,
        XmppAction::Register { username, password } => {
            let fields = HashMap::from([
                (format!("{}-username", RegisterForm::PREFIX), username),
                (format!("{}-password", RegisterForm::PREFIX), password),
            ]);
            let mut form = RegisterForm::bind(&fields);
            let Some(account) = form.clean::<RegisterForm>() else {
                anyhow::bail!("username and password must not be empty");
            };
            register_user(&runner, &account.username, &account.password, &mut messages).await?;
        },
    }

    print_messages(&messages);
    if messages.count(Severity::Error) > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn set_inband(
    runner: &CliActionRunner,
    inband_enabled: bool,
    messages: &mut Messages,
) -> Result<()> {
    let old = get_status(runner).await?;
    apply_changes(runner, old, XmppStatus { inband_enabled }, messages).await?;
    Ok(())
}

fn print_messages(messages: &Messages) {
    for message in messages.iter() {
        match message.severity {
            Severity::Error => eprintln!("error: {}", message.text),
            Severity::Info | Severity::Success => println!("{}", message.text),
        }
    }
}
