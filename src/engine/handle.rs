//! Native widget trait and the shared handle the tree holds.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::types::{Capabilities, Value};

use super::properties::PropertyTable;

/// Property change listener. Receives the value just written.
pub type PropertyListener = Rc<dyn Fn(&Value)>;

/// Named event handler.
pub type EventHandler = Rc<dyn Fn(&Event)>;

// =============================================================================
// Widget
// =============================================================================

/// Downcasting support for `dyn Widget`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A native visual object.
///
/// Implementors hold a [`WidgetState`] (identity, style, children, listeners)
/// and expose their own properties through a static [`PropertyTable`].
pub trait Widget: AsAny {
    /// Short type label, used in errors and hierarchy dumps.
    fn type_name(&self) -> &'static str;

    /// Whether this widget accepts child handles.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn state(&self) -> &WidgetState;

    fn state_mut(&mut self) -> &mut WidgetState;

    fn properties(&self) -> &'static dyn PropertyTable;
}

/// State every widget carries regardless of type.
pub struct WidgetState {
    pub(crate) id: Option<String>,
    pub(crate) style: String,
    pub(crate) classes: Vec<String>,
    pub(crate) visible: bool,
    pub(crate) disabled: bool,
    pub(crate) opacity: f64,
    pub(crate) children: Vec<Handle>,
    listeners: HashMap<String, Vec<PropertyListener>>,
    handlers: HashMap<String, Vec<EventHandler>>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            id: None,
            style: String::new(),
            classes: Vec::new(),
            visible: true,
            disabled: false,
            opacity: 1.0,
            children: Vec::new(),
            listeners: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

impl WidgetState {
    fn listeners_for(&self, property: &str) -> Vec<PropertyListener> {
        self.listeners.get(property).cloned().unwrap_or_default()
    }

    fn handlers_for(&self, event: &str) -> Vec<EventHandler> {
        self.handlers.get(event).cloned().unwrap_or_default()
    }
}

/// Event raised by a widget (for example `"action"` on a button click).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub payload: Value,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Shared reference to a native widget.
///
/// Clones point at the same widget. No borrow is held while listeners or
/// event handlers run, so they may read and write the widget again.
#[derive(Clone)]
pub struct Handle(Rc<RefCell<dyn Widget>>);

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widget = self.0.borrow();
        f.debug_struct("Handle")
            .field("type", &widget.type_name())
            .field("id", &widget.state().id)
            .field("children", &widget.state().children.len())
            .finish()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Handle {
    pub fn new<W: Widget>(widget: W) -> Self {
        Handle(Rc::new(RefCell::new(widget)))
    }

    pub fn type_name(&self) -> &'static str {
        self.0.borrow().type_name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.0.borrow().capabilities()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the widget is a `W`.
    pub fn is<W: Widget>(&self) -> bool {
        let widget = self.0.borrow();
        (*widget).as_any().is::<W>()
    }

    /// Run `f` against the typed widget. `None` if the widget is not a `W`.
    pub fn with<W: Widget, R>(&self, f: impl FnOnce(&W) -> R) -> Option<R> {
        let widget = self.0.borrow();
        (*widget).as_any().downcast_ref::<W>().map(f)
    }

    /// Mutable variant of [`with`](Self::with). Listeners are not notified.
    pub fn with_mut<W: Widget, R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        let mut widget = self.0.borrow_mut();
        (*widget).as_any_mut().downcast_mut::<W>().map(f)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn has_property(&self, name: &str) -> bool {
        self.0.borrow().properties().has(name)
    }

    pub fn is_writable(&self, name: &str) -> bool {
        self.0.borrow().properties().is_writable(name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.0.borrow().properties().names()
    }

    pub fn get_property(&self, name: &str) -> Result<Value> {
        let widget = self.0.borrow();
        widget.properties().read(&*widget, name)
    }

    /// Write a property, then notify its listeners with the new value.
    pub fn set_property(&self, name: &str, value: Value) -> Result<()> {
        let key = name.to_ascii_lowercase();
        let listeners = {
            let mut widget = self.0.borrow_mut();
            let table = widget.properties();
            table.write(&mut *widget, &key, &value)?;
            widget.state().listeners_for(&key)
        };
        for listener in listeners {
            listener(&value);
        }
        Ok(())
    }

    /// Write a property from a callback that cannot return an error.
    ///
    /// Failures are logged and dropped.
    pub fn push_property(&self, name: &str, value: Value) {
        if let Err(err) = self.set_property(name, value) {
            warn!(target: "spark_tree::engine", property = name, %err, "reactive write rejected");
        }
    }

    /// Register a listener for changes of `name`.
    pub fn on_property(&self, name: &str, listener: impl Fn(&Value) + 'static) -> Result<()> {
        let mut widget = self.0.borrow_mut();
        if !widget.properties().has(name) {
            return Err(Error::unknown_property(name, widget.type_name()));
        }
        widget
            .state_mut()
            .listeners
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(Rc::new(listener));
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a handler for the event called `name`.
    pub fn on_event(&self, name: &str, handler: impl Fn(&Event) + 'static) {
        self.0
            .borrow_mut()
            .state_mut()
            .handlers
            .entry(name.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Deliver `event` to every handler registered for its name, in order.
    pub fn fire(&self, event: &Event) {
        let handlers = self.0.borrow().state().handlers_for(&event.name);
        for handler in handlers {
            handler(event);
        }
    }

    // =========================================================================
    // Identity and style
    // =========================================================================

    pub fn id(&self) -> Option<String> {
        self.0.borrow().state().id.clone()
    }

    pub fn set_id(&self, id: Option<String>) {
        self.0.borrow_mut().state_mut().id = id;
    }

    pub fn style(&self) -> String {
        self.0.borrow().state().style.clone()
    }

    pub fn set_style(&self, style: impl Into<String>) {
        self.0.borrow_mut().state_mut().style = style.into();
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().state().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().state().classes.iter().any(|c| c == class)
    }

    /// Add a style class. Adding a class twice keeps one entry.
    pub fn add_class(&self, class: &str) {
        let mut widget = self.0.borrow_mut();
        let classes = &mut widget.state_mut().classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) -> bool {
        let mut widget = self.0.borrow_mut();
        let classes = &mut widget.state_mut().classes;
        let before = classes.len();
        classes.retain(|c| c != class);
        classes.len() != before
    }

    // =========================================================================
    // Native children
    // =========================================================================

    pub fn children(&self) -> Vec<Handle> {
        self.0.borrow().state().children.clone()
    }

    fn require_container(&self, operation: &str) -> Result<()> {
        let widget = self.0.borrow();
        if widget.capabilities().contains(Capabilities::CONTAINER) {
            Ok(())
        } else {
            Err(Error::unsupported(format!(
                "{} cannot {operation} child widgets.",
                widget.type_name()
            )))
        }
    }

    /// Append `child` to the native child list.
    pub fn attach(&self, child: &Handle) -> Result<()> {
        if self.ptr_eq(child) {
            return Err(Error::illegal_state("A widget cannot contain itself."));
        }
        self.require_container("attach")?;
        trace!(target: "spark_tree::engine", parent = self.type_name(), child = child.type_name(), "attach");
        self.0.borrow_mut().state_mut().children.push(child.clone());
        Ok(())
    }

    /// Remove `child` from the native child list. `Ok(false)` if absent.
    pub fn detach(&self, child: &Handle) -> Result<bool> {
        self.require_container("detach")?;
        let mut widget = self.0.borrow_mut();
        let children = &mut widget.state_mut().children;
        match children.iter().position(|c| c.ptr_eq(child)) {
            Some(index) => {
                children.remove(index);
                trace!(target: "spark_tree::engine", child = child.type_name(), "detach");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear_children(&self) -> Result<()> {
        self.require_container("clear")?;
        self.0.borrow_mut().state_mut().children.clear();
        Ok(())
    }
}
