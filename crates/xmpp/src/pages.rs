//! Handlers for the XMPP landing, configure and register pages.
//!
//! Configure and register accept fields from the query string and from a
//! urlencoded body; an empty field map means "show the form". A POST whose
//! body is not urlencoded contributes no fields.

use std::collections::HashMap;

use {
    askama::Template,
    axum::{
        Form as BodyForm,
        extract::{Query, State, rejection::FormRejection},
        response::Html,
    },
    boxpanel_web::{AppState, Form, Menu, MenuItem, Messages, Page, Result, render_page},
    tracing::debug,
};

use crate::{
    forms::{ConfigureForm, RegisterForm},
    register::register_user,
    status::{apply_changes, get_status},
};

pub const INDEX_URL: &str = "/apps/xmpp";
pub const CONFIGURE_URL: &str = "/apps/xmpp/configure";
pub const REGISTER_URL: &str = "/apps/xmpp/register";

type Fields = HashMap<String, String>;

type BodyFields = std::result::Result<BodyForm<Fields>, FormRejection>;

fn merge_body(mut query: Fields, body: BodyFields) -> Fields {
    match body {
        Ok(BodyForm(body)) => query.extend(body),
        Err(rejection) => debug!(%rejection, "ignoring request body"),
    }
    query
}

/// Side menu shared by every XMPP page.
pub fn side_menu() -> Menu {
    Menu::new("XMPP")
        .with_item(MenuItem::new("Configure XMPP Server", CONFIGURE_URL))
        .with_item(MenuItem::new("Register XMPP Account", REGISTER_URL))
}

#[derive(Template)]
#[template(path = "xmpp_configure.html", escape = "html")]
struct ConfigureTemplate {
    form: String,
}

#[derive(Template)]
#[template(path = "xmpp_register.html", escape = "html")]
struct RegisterTemplate {
    form: String,
}

// ── Landing ──────────────────────────────────────────────────────────────────

pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, Page {
        title: "XMPP Server",
        main: "<p>XMPP Server Accounts and Configuration</p>".into(),
        sidebar_right: side_menu().render_block()?,
        ..Page::default()
    })
}

// ── Configure ────────────────────────────────────────────────────────────────

pub async fn configure_get_handler(
    State(state): State<AppState>,
    Query(query): Query<Fields>,
) -> Result<Html<String>> {
    configure(&state, query).await
}

pub async fn configure_post_handler(
    State(state): State<AppState>,
    Query(query): Query<Fields>,
    body: BodyFields,
) -> Result<Html<String>> {
    configure(&state, merge_body(query, body)).await
}

async fn configure(state: &AppState, fields: Fields) -> Result<Html<String>> {
    let runner = state.runner.as_ref();
    let status = get_status(runner).await?;
    let mut messages = Messages::new();

    let form = if fields.is_empty() {
        ConfigureForm::from_status(status)
    } else {
        let mut form = ConfigureForm::bind(&fields);
        match form.clean::<ConfigureForm>() {
            Some(submitted) => {
                apply_changes(runner, status, submitted.status(), &mut messages).await?;
                ConfigureForm::from_status(get_status(runner).await?)
            },
            None => {
                debug!("invalid xmpp configure submission");
                form
            },
        }
    };

    let main = ConfigureTemplate {
        form: form.render(CONFIGURE_URL, "Update setup")?,
    }
    .render()?;
    render_page(state, Page {
        title: "Configure XMPP Server",
        main,
        sidebar_right: side_menu().render_block()?,
        messages: Some(&messages),
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub async fn register_get_handler(
    State(state): State<AppState>,
    Query(query): Query<Fields>,
) -> Result<Html<String>> {
    register(&state, query).await
}

pub async fn register_post_handler(
    State(state): State<AppState>,
    Query(query): Query<Fields>,
    body: BodyFields,
) -> Result<Html<String>> {
    register(&state, merge_body(query, body)).await
}

async fn register(state: &AppState, fields: Fields) -> Result<Html<String>> {
    let mut messages = Messages::new();

    let form = if fields.is_empty() {
        RegisterForm::unbound()
    } else {
        let mut form = RegisterForm::bind(&fields);
        match form.clean::<RegisterForm>() {
            Some(account) => {
                let registered = register_user(
                    state.runner.as_ref(),
                    &account.username,
                    &account.password,
                    &mut messages,
                )
                .await?;
                // A refused registration keeps the submitted username on screen.
                if registered {
                    RegisterForm::unbound()
                } else {
                    form
                }
            },
            None => {
                debug!("invalid xmpp register submission");
                form
            },
        }
    };

    let main = RegisterTemplate {
        form: form.render(REGISTER_URL, "Register")?,
    }
    .render()?;
    render_page(state, Page {
        title: "Register XMPP Account",
        main,
        sidebar_right: side_menu().render_block()?,
        messages: Some(&messages),
    })
}
