//! Editable text widgets.

use std::sync::OnceLock;

use crate::engine::{Handle, PropertyRegistry, WidgetState, assign};
use crate::types::{Capabilities, Value};

/// Single-line text input.
pub struct TextField {
    state: WidgetState,
    text: String,
    prompt: String,
    editable: bool,
}

impl Default for TextField {
    fn default() -> Self {
        Self {
            state: WidgetState::default(),
            text: String::new(),
            prompt: String::new(),
            editable: true,
        }
    }
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Append typed characters to the field behind `handle`, as user input
    /// would. Ignored when the field is not editable.
    pub fn type_text(handle: &Handle, typed: &str) {
        let current = handle.with::<TextField, _>(|f| f.editable.then(|| f.text.clone()));
        if let Some(Some(mut text)) = current {
            text.push_str(typed);
            handle.push_property("text", Value::Text(text));
        }
    }

    fn registry() -> &'static PropertyRegistry<TextField> {
        static REGISTRY: OnceLock<PropertyRegistry<TextField>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<TextField>::common("TextField")
                .property(
                    "text",
                    |w| Value::Text(w.text.clone()),
                    |w, v| {
                        w.text = v.as_text();
                        true
                    },
                )
                .property(
                    "promptText",
                    |w| Value::Text(w.prompt.clone()),
                    |w, v| {
                        w.prompt = v.as_text();
                        true
                    },
                )
                .property(
                    "editable",
                    |w| Value::Bool(w.editable),
                    |w, v| assign(v.as_bool(), |b| w.editable = b),
                )
        })
    }
}

impl_widget!(TextField, Capabilities::NONE);

/// Multi-line text input.
pub struct TextArea {
    state: WidgetState,
    text: String,
    prompt: String,
    editable: bool,
    wrap: bool,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            state: WidgetState::default(),
            text: String::new(),
            prompt: String::new(),
            editable: true,
            wrap: false,
        }
    }
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines of the current text.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    fn registry() -> &'static PropertyRegistry<TextArea> {
        static REGISTRY: OnceLock<PropertyRegistry<TextArea>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<TextArea>::common("TextArea")
                .property(
                    "text",
                    |w| Value::Text(w.text.clone()),
                    |w, v| {
                        w.text = v.as_text();
                        true
                    },
                )
                .property(
                    "promptText",
                    |w| Value::Text(w.prompt.clone()),
                    |w, v| {
                        w.prompt = v.as_text();
                        true
                    },
                )
                .property(
                    "editable",
                    |w| Value::Bool(w.editable),
                    |w, v| assign(v.as_bool(), |b| w.editable = b),
                )
                .property(
                    "wrapText",
                    |w| Value::Bool(w.wrap),
                    |w, v| assign(v.as_bool(), |b| w.wrap = b),
                )
        })
    }
}

impl_widget!(TextArea, Capabilities::NONE);
