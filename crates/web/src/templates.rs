//! Full-page layout rendering.

use {askama::Template, axum::response::Html};

use crate::{
    error::Result,
    menu::Menu,
    messages::{Message, Messages},
    state::AppState,
};

/// Everything a page contributes to the shared layout.
#[derive(Debug, Default)]
pub struct Page<'a> {
    pub title: &'a str,
    /// Pre-rendered HTML for the main column.
    pub main: String,
    /// Pre-rendered HTML for the right sidebar, usually a menu block.
    pub sidebar_right: String,
    pub messages: Option<&'a Messages>,
}

#[derive(Template)]
#[template(path = "base.html", escape = "html")]
struct LayoutTemplate<'a> {
    title: &'a str,
    apps_menu: &'a Menu,
    messages: &'a [Message],
    main: &'a str,
    sidebar_right: &'a str,
}

/// Render `page` inside the panel layout.
pub fn render_page(state: &AppState, page: Page<'_>) -> Result<Html<String>> {
    render_layout(&state.apps_menu, page).map(Html)
}

pub(crate) fn render_layout(apps_menu: &Menu, page: Page<'_>) -> Result<String> {
    let messages = page.messages.map(Messages::as_slice).unwrap_or_default();
    let html = LayoutTemplate {
        title: page.title,
        apps_menu,
        messages,
        main: &page.main,
        sidebar_right: &page.sidebar_right,
    }
    .render()?;
    Ok(html)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::menu::MenuItem};

    #[test]
    fn layout_includes_all_parts() {
        let menu = Menu::new("Apps").with_item(MenuItem::new("XMPP", "/apps/xmpp").order(40));
        let mut messages = Messages::new();
        messages.success("Inband registration enabled");

        let html = render_layout(&menu, Page {
            title: "Configure XMPP Server",
            main: "<p>body</p>".into(),
            sidebar_right: "<div id=\"side\"></div>".into(),
            messages: Some(&messages),
        })
        .unwrap();

        assert!(html.contains("<title>Configure XMPP Server"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("<div id=\"side\"></div>"));
        assert!(html.contains("alert-success"));
        assert!(html.contains("Inband registration enabled"));
        assert!(html.contains("href=\"/apps/xmpp\""));
    }

    #[test]
    fn message_text_is_escaped() {
        let mut messages = Messages::new();
        messages.error("Failed to register account for <b>x</b>");
        let html = render_layout(&Menu::default(), Page {
            title: "t",
            messages: Some(&messages),
            ..Page::default()
        })
        .unwrap();
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("&#60;b&#62;x"));
    }
}
