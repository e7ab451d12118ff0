//! Native widget interface.
//!
//! The tree never talks to a concrete toolkit. It holds [`Handle`]s to
//! objects implementing [`Widget`] and uses three capabilities:
//! - create/attach/detach child handles in a parent-child relation
//! - look up a bindable property by name through the widget type's
//!   [`PropertyRegistry`]
//! - read and write identity (`id`), inline style and style classes
//!
//! # Architecture
//!
//! ```text
//! Handle ──Rc<RefCell<dyn Widget>>──► concrete widget (Text, VBox, ...)
//!                                         │
//!                                         ├── WidgetState  (id, style, classes, children, listeners)
//!                                         └── &'static PropertyRegistry<W>  (name → getter/setter)
//! ```
//!
//! Property names are case-insensitive. Listeners and event handlers run
//! after the widget borrow is released.

mod handle;
mod properties;

pub use handle::*;
pub use properties::*;
