//! Control factories.
//!
//! Each factory wraps a fresh headless widget in a ready [`Component`]:
//!
//! ```
//! use spark_tree::primitives::{button, text, vbox};
//!
//! let view = vbox([text("Count: 0"), button("+1")]);
//! assert_eq!(view.children().len(), 2);
//! ```

use crate::component::Component;
use crate::engine::{Event, Handle};
use crate::error::Result;
use crate::reactive::ReactiveValue;
use crate::types::Value;
use crate::widgets::{BorderPane, Button, CheckBox, HBox, Pane, Text, TextArea, TextField, VBox};

// =============================================================================
// Labeled
// =============================================================================

pub fn text(content: impl Into<String>) -> Component {
    Component::leaf(Handle::new(Text::new(content)))
}

pub fn button(label: impl Into<String>) -> Component {
    Component::leaf(Handle::new(Button::new(label)))
}

/// Button that calls `on_action` with itself on every click.
pub fn button_with(
    label: impl Into<String>,
    on_action: impl Fn(&Component, &Event) + 'static,
) -> Component {
    let handle = Handle::new(Button::new(label));
    let node = Component::leaf(handle.clone());
    let weak = node.downgrade();
    handle.on_event(Button::ACTION, move |event| {
        if let Some(node) = weak.upgrade() {
            on_action(&node, event);
        }
    });
    node
}

pub fn check_box(label: impl Into<String>) -> Component {
    Component::leaf(Handle::new(CheckBox::new(label)))
}

// =============================================================================
// Input
// =============================================================================

/// Empty text field showing `prompt` as a placeholder.
pub fn text_field(prompt: impl Into<String>) -> Component {
    Component::leaf(Handle::new(TextField::with_prompt(prompt)))
}

/// Text field whose `text` follows `value`.
///
/// Edits made in the field do not flow back into `value`; listen with
/// [`Component::on`] for that.
pub fn text_field_bound(value: &ReactiveValue<Value>) -> Result<Component> {
    Component::leaf(Handle::new(TextField::new())).bind("text", value)
}

pub fn text_area(content: impl Into<String>) -> Result<Component> {
    let content: String = content.into();
    Component::leaf(Handle::new(TextArea::new())).set("text", content)
}

// =============================================================================
// Containers
// =============================================================================

pub fn pane(children: impl IntoIterator<Item = Component>) -> Component {
    Component::new(Some(Handle::new(Pane::new())), children)
}

pub fn hbox(children: impl IntoIterator<Item = Component>) -> Component {
    Component::new(Some(Handle::new(HBox::new())), children)
}

pub fn vbox(children: impl IntoIterator<Item = Component>) -> Component {
    Component::new(Some(Handle::new(VBox::new())), children)
}

/// Border pane around `children`. Construction leaves the regions empty;
/// place handles with [`Component::fluent`].
pub fn border_pane(children: impl IntoIterator<Item = Component>) -> Component {
    Component::new(Some(Handle::new(BorderPane::new())), children)
}

/// Invisible node standing in for `child`.
pub fn wrap(child: Component) -> Component {
    Component::wrap(child)
}
