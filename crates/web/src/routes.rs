//! Routes the panel serves regardless of which plugins are mounted.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect},
};

use crate::{
    error::Result,
    state::AppState,
    templates::{Page, render_page},
};

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn root_handler() -> Redirect {
    Redirect::to("/apps")
}

/// Index of installed apps, built from the main menu.
pub async fn apps_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    render_page(&state, Page {
        title: "Apps",
        main: state.apps_menu.render_block()?,
        ..Page::default()
    })
}

pub async fn services_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.services.list())
}
