//! # Views
//!
//! Handlebars templates compiled into the binary. Every page wraps itself in
//! the `layout` partial. Handlers pass a view name and a JSON mapping; all
//! shaping (selected options, error lists) happens before rendering so the
//! templates stay free of logic.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for rendering
pub type ViewResult<T> = Result<T, ViewError>;

/// Template registration and rendering errors
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

const LAYOUT: &str = include_str!("../../templates/layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("home", include_str!("../../templates/home.hbs")),
    ("customers", include_str!("../../templates/customers/index.hbs")),
    ("customers/create", include_str!("../../templates/customers/create.hbs")),
    ("customers/edit", include_str!("../../templates/customers/edit.hbs")),
    ("customers/delete", include_str!("../../templates/customers/delete.hbs")),
    ("employees", include_str!("../../templates/employees/index.hbs")),
    ("employees/create", include_str!("../../templates/employees/create.hbs")),
    ("employees/edit", include_str!("../../templates/employees/edit.hbs")),
    ("employees/delete", include_str!("../../templates/employees/delete.hbs")),
];

/// Registered page templates
#[derive(Debug)]
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    /// Compile the layout and every page
    pub fn new() -> ViewResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry
            .register_partial("layout", LAYOUT)
            .map_err(Box::new)?;

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    /// Render `view` with `data`
    pub fn render(&self, view: &str, data: &Value) -> ViewResult<String> {
        Ok(self.registry.render(view, data)?)
    }

    pub fn has_view(&self, view: &str) -> bool {
        self.registry.has_template(view)
    }
}

/// One `<option>` or checkbox in a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    /// Choice whose value is an id, selected when it appears in `selected`
    pub fn for_id(id: i64, label: impl Into<String>, selected: &[String]) -> Self {
        let value = id.to_string();
        let selected = selected.iter().any(|s| s.trim() == value);
        Self {
            value,
            label: label.into(),
            selected,
        }
    }
}
