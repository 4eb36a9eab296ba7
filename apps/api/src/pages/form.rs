//! Form fields bound to a form-state container.
//!
//! A `FormField` describes one labelled input; `FormState` holds the values the
//! user submitted and any per-field error messages. Rendering a field against a
//! state produces the input pre-filled with its bound value and its message.

use std::collections::HashMap;
use std::fmt;

use askama::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Password,
    File,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::File => "file",
        }
    }

    /// Password and file inputs are never re-filled from submitted values.
    fn echoes_value(&self) -> bool {
        matches!(self, InputKind::Text | InputKind::Email)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: HashMap<String, String>,
    errors: HashMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set_error(&mut self, name: &str, message: &str) {
        self.errors.insert(name.to_string(), message.to_string());
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FormField<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub placeholder: &'a str,
    pub kind: InputKind,
}

impl<'a> FormField<'a> {
    pub fn new(name: &'a str, label: &'a str) -> Self {
        Self {
            name,
            label,
            placeholder: "",
            kind: InputKind::Text,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn render(&self, state: &FormState) -> Result<String, askama::Error> {
        let value = if self.kind.echoes_value() {
            state.value(self.name)
        } else {
            ""
        };

        FormFieldTemplate {
            field: self,
            value,
            error: state.error(self.name),
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "form_field.html")]
struct FormFieldTemplate<'a> {
    field: &'a FormField<'a>,
    value: &'a str,
    error: Option<&'a str>,
}
