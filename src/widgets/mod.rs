//! Headless reference widgets.
//!
//! A small in-memory toolkit implementing [`Widget`](crate::engine::Widget).
//! Nothing is drawn: the widgets only keep their property values and child
//! lists, which is all the tree needs. Applications targeting a real toolkit
//! implement `Widget` for their own types the same way.
//!
//! | Widget | Capabilities | Properties (besides visible/disable/opacity) |
//! |---|---|---|
//! | [`Pane`] | container | - |
//! | [`HBox`], [`VBox`] | container | spacing |
//! | [`BorderPane`] | container, manages children | - |
//! | [`Text`] | - | text, wraptext |
//! | [`Button`] | - | text, defaultbutton |
//! | [`TextField`] | - | text, prompttext, editable |
//! | [`TextArea`] | - | text, prompttext, editable, wraptext |
//! | [`CheckBox`] | - | text, selected |

/// Implements `Widget` for a struct with a `state: WidgetState` field and a
/// `registry()` associated function.
macro_rules! impl_widget {
    ($ty:ident, $caps:expr) => {
        impl $crate::engine::Widget for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn capabilities(&self) -> $crate::types::Capabilities {
                $caps
            }

            fn state(&self) -> &$crate::engine::WidgetState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut $crate::engine::WidgetState {
                &mut self.state
            }

            fn properties(&self) -> &'static dyn $crate::engine::PropertyTable {
                Self::registry()
            }
        }
    };
}

mod input;
mod labeled;
mod panes;

pub use input::{TextArea, TextField};
pub use labeled::{Button, CheckBox, Text};
pub use panes::{BorderPane, HBox, Pane, VBox};
