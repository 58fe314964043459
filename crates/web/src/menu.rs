//! Navigation menus: the main "Apps" menu and per-app side menus.

use askama::Template;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub icon: String,
    pub url: String,
    pub order: i32,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: String::new(),
            url: url.into(),
            order: 0,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Titled list of links kept sorted by `order` (stable for ties).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: MenuItem) {
        self.items.push(item);
        self.items.sort_by_key(|i| i.order);
    }

    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.add_item(item);
        self
    }

    /// Render as a sidebar block.
    pub fn render_block(&self) -> askama::Result<String> {
        MenuBlockTemplate { menu: self }.render()
    }
}

#[derive(Template)]
#[template(path = "menu_block.html", escape = "html")]
struct MenuBlockTemplate<'a> {
    menu: &'a Menu,
}
