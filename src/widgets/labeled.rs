//! Labeled leaf widgets: text, button, check box.

use std::sync::OnceLock;

use crate::engine::{Event, Handle, PropertyRegistry, WidgetState, assign};
use crate::types::{Capabilities, Value};

// =============================================================================
// Text
// =============================================================================

/// Static text.
#[derive(Default)]
pub struct Text {
    state: WidgetState,
    text: String,
    wrap: bool,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    fn registry() -> &'static PropertyRegistry<Text> {
        static REGISTRY: OnceLock<PropertyRegistry<Text>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<Text>::common("Text")
                .property(
                    "text",
                    |w| Value::Text(w.text.clone()),
                    |w, v| {
                        w.text = v.as_text();
                        true
                    },
                )
                .property(
                    "wrapText",
                    |w| Value::Bool(w.wrap),
                    |w, v| assign(v.as_bool(), |b| w.wrap = b),
                )
        })
    }
}

impl_widget!(Text, Capabilities::NONE);

// =============================================================================
// Button
// =============================================================================

/// Push button. Fires [`Button::ACTION`] when clicked.
#[derive(Default)]
pub struct Button {
    state: WidgetState,
    text: String,
    default_button: bool,
}

impl Button {
    /// Event fired on click.
    pub const ACTION: &'static str = "action";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Simulate a click on the button behind `handle`.
    ///
    /// Disabled buttons and handles that are not buttons ignore the click.
    pub fn click(handle: &Handle) {
        let enabled = handle
            .with::<Button, _>(|b| !b.state.disabled)
            .unwrap_or(false);
        if enabled {
            handle.fire(&Event::new(Self::ACTION));
        }
    }

    fn registry() -> &'static PropertyRegistry<Button> {
        static REGISTRY: OnceLock<PropertyRegistry<Button>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<Button>::common("Button")
                .property(
                    "text",
                    |w| Value::Text(w.text.clone()),
                    |w, v| {
                        w.text = v.as_text();
                        true
                    },
                )
                .property(
                    "defaultButton",
                    |w| Value::Bool(w.default_button),
                    |w, v| assign(v.as_bool(), |b| w.default_button = b),
                )
        })
    }
}

impl_widget!(Button, Capabilities::NONE);

// =============================================================================
// CheckBox
// =============================================================================

/// Two-state check box.
#[derive(Default)]
pub struct CheckBox {
    state: WidgetState,
    text: String,
    selected: bool,
}

impl CheckBox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Flip the selection of the check box behind `handle`, notifying
    /// `selected` listeners.
    pub fn toggle(handle: &Handle) {
        if let Some(selected) = handle.with::<CheckBox, _>(CheckBox::is_selected) {
            handle.push_property("selected", Value::Bool(!selected));
        }
    }

    fn registry() -> &'static PropertyRegistry<CheckBox> {
        static REGISTRY: OnceLock<PropertyRegistry<CheckBox>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            PropertyRegistry::<CheckBox>::common("CheckBox")
                .property(
                    "text",
                    |w| Value::Text(w.text.clone()),
                    |w, v| {
                        w.text = v.as_text();
                        true
                    },
                )
                .property(
                    "selected",
                    |w| Value::Bool(w.selected),
                    |w, v| assign(v.as_bool(), |b| w.selected = b),
                )
        })
    }
}

impl_widget!(CheckBox, Capabilities::NONE);
