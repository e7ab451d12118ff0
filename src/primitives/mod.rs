//! Tree-building primitives.
//!
//! - [`Component::builder`](crate::Component::builder) - children rebuilt
//!   from a [`ReactiveCollection`](crate::ReactiveCollection)
//! - control factories ([`text`], [`button`], [`text_field`], [`vbox`], ...)
//!   returning ready components around the headless widgets
//!
//! ```
//! use spark_tree::primitives::{button_with, text, vbox};
//! use spark_tree::{ReactiveValue, Value};
//!
//! let count = ReactiveValue::new(Value::Int(0));
//! let shown = text("0");
//! shown.compute("text", &count, |n| n.map(Value::as_text).unwrap_or_default()).unwrap();
//!
//! let counter = count.clone();
//! let view = vbox([
//!     shown.clone(),
//!     button_with("+1", move |_, _| {
//!         counter.update(|n| Value::Int(n.and_then(|v| v.as_int()).unwrap_or(0) + 1))
//!     }),
//! ]);
//! # let _ = view;
//! count.set(Value::Int(4));
//! assert_eq!(shown.get("text").unwrap(), Value::from("4"));
//! ```

mod control_flow;
mod controls;

pub use controls::{
    border_pane, button, button_with, check_box, hbox, pane, text, text_area, text_field,
    text_field_bound, vbox, wrap,
};
