//! # HTML Views
//!
//! Pages are Handlebars templates embedded from `templates/` at compile
//! time. Every page template wraps its content in the `layout` partial,
//! which renders the parts all pages share: title, logged-in user, flash
//! messages and the error block. Handlebars escapes `{{...}}` output, so
//! user-supplied text never reaches the page as markup.

use std::sync::LazyLock;

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use crate::db::models::User;
use crate::error::{AppError, AppResult};

const LAYOUT: &str = include_str!("../templates/layout.html.hbs");

const PAGES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.html.hbs")),
    ("login", include_str!("../templates/login.html.hbs")),
    ("cards", include_str!("../templates/cards.html.hbs")),
    ("decks", include_str!("../templates/decks.html.hbs")),
    ("deck", include_str!("../templates/deck.html.hbs")),
    ("users", include_str!("../templates/users.html.hbs")),
    ("games", include_str!("../templates/games.html.hbs")),
    ("play", include_str!("../templates/play.html.hbs")),
    ("error", include_str!("../templates/error.html.hbs")),
];

// The templates are part of the binary; failing to parse one is a build
// defect, caught by `all_templates_register` below.
static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_partial("layout", LAYOUT)
        .expect("layout template parses");
    for (name, source) in PAGES {
        handlebars
            .register_template_string(name, source)
            .expect("page template parses");
    }
    handlebars
});

/// Shared page data, rendered by the `layout` partial
#[derive(Debug, Default, Serialize)]
pub struct Page {
    title: String,
    user: Option<User>,
    flashes: Vec<String>,
    error: Option<String>,
}

impl Page {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }

    pub fn with_flashes(mut self, flashes: Vec<String>) -> Self {
        self.flashes = flashes;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Render `template` with this page's data plus the keys of `body`
    ///
    /// `body` must be a JSON object (or null for templates that need no
    /// data of their own).
    pub fn render(&self, template: &str, body: Value) -> AppResult<Html<String>> {
        let mut context = serde_json::to_value(self)?;
        if let (Value::Object(context), Value::Object(body)) = (&mut context, body) {
            context.extend(body);
        }

        TEMPLATES
            .render(template, &context)
            .map(Html)
            .map_err(|e| AppError::Internal(format!("rendering template '{}': {}", template, e)))
    }
}
