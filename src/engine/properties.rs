//! Per-widget-type property registry.
//!
//! Each widget type builds one [`PropertyRegistry`] (usually in a
//! `OnceLock`) mapping lowercase property names to a getter/setter pair.
//! The tree consults it by name when reading, writing or binding a property;
//! a missing entry is an unknown property.
//!
//! ```text
//! "text"       -> (get: |w| w.text,     set: |w, v| w.text = v)
//! "prompttext" -> (get: |w| w.prompt,   set: |w, v| w.prompt = v)
//! "visible"    -> (get: |w| w.visible,  set: |w, v| w.visible = v)   (common)
//! ```

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::Value;

use super::handle::Widget;

/// Property getter.
pub type Getter<W> = fn(&W) -> Value;

/// Property setter. Returns `false` when the value has the wrong shape.
pub type Setter<W> = fn(&mut W, &Value) -> bool;

/// Getter plus optional setter for one named property.
pub struct Accessor<W> {
    pub get: Getter<W>,
    pub set: Option<Setter<W>>,
}

/// Name → accessor table for widget type `W`.
pub struct PropertyRegistry<W> {
    type_name: &'static str,
    entries: HashMap<String, Accessor<W>>,
}

impl<W: Widget> PropertyRegistry<W> {
    /// Empty registry.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            entries: HashMap::new(),
        }
    }

    /// Registry pre-filled with the properties every widget has
    /// (`visible`, `disable`, `opacity`).
    pub fn common(type_name: &'static str) -> Self {
        Self::new(type_name)
            .property(
                "visible",
                |w| Value::Bool(w.state().visible),
                |w, v| assign(v.as_bool(), |b| w.state_mut().visible = b),
            )
            .property(
                "disable",
                |w| Value::Bool(w.state().disabled),
                |w, v| assign(v.as_bool(), |b| w.state_mut().disabled = b),
            )
            .property(
                "opacity",
                |w| Value::Float(w.state().opacity),
                |w, v| assign(v.as_float(), |o| w.state_mut().opacity = o.clamp(0.0, 1.0)),
            )
    }

    /// Register a writable property.
    pub fn property(mut self, name: &str, get: Getter<W>, set: Setter<W>) -> Self {
        self.entries.insert(
            name.to_ascii_lowercase(),
            Accessor {
                get,
                set: Some(set),
            },
        );
        self
    }

    /// Register a read-only property.
    pub fn read_only(mut self, name: &str, get: Getter<W>) -> Self {
        self.entries
            .insert(name.to_ascii_lowercase(), Accessor { get, set: None });
        self
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&Accessor<W>> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    fn downcast<'a>(&self, widget: &'a dyn Widget) -> Result<&'a W> {
        widget.as_any().downcast_ref::<W>().ok_or_else(|| {
            Error::binding(format!(
                "{} registry used with a {} handle.",
                self.type_name,
                widget.type_name()
            ))
        })
    }
}

/// Apply a converted value, reporting whether the conversion succeeded.
pub(crate) fn assign<T>(value: Option<T>, apply: impl FnOnce(T)) -> bool {
    match value {
        Some(value) => {
            apply(value);
            true
        }
        None => false,
    }
}

// =============================================================================
// Object-safe view
// =============================================================================

/// Type-erased view of a [`PropertyRegistry`], used through `dyn Widget`.
pub trait PropertyTable: Send + Sync {
    /// Whether `name` is a known property.
    fn has(&self, name: &str) -> bool;

    /// Whether `name` is known and writable.
    fn is_writable(&self, name: &str) -> bool;

    /// Registered names, sorted.
    fn names(&self) -> Vec<String>;

    fn read(&self, widget: &dyn Widget, name: &str) -> Result<Value>;

    fn write(&self, widget: &mut dyn Widget, name: &str, value: &Value) -> Result<()>;
}

impl<W: Widget> PropertyTable for PropertyRegistry<W> {
    fn has(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn is_writable(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|accessor| accessor.set.is_some())
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    fn read(&self, widget: &dyn Widget, name: &str) -> Result<Value> {
        let accessor = self
            .lookup(name)
            .ok_or_else(|| Error::unknown_property(name, self.type_name))?;
        let widget = self.downcast(widget)?;
        Ok((accessor.get)(widget))
    }

    fn write(&self, widget: &mut dyn Widget, name: &str, value: &Value) -> Result<()> {
        let accessor = self
            .lookup(name)
            .ok_or_else(|| Error::unknown_property(name, self.type_name))?;
        let Some(set) = accessor.set else {
            return Err(Error::binding(format!(
                "Property '{}' of {} is read-only.",
                name.to_ascii_lowercase(),
                self.type_name
            )));
        };
        let type_name = widget.type_name();
        let widget = widget.as_any_mut().downcast_mut::<W>().ok_or_else(|| {
            Error::binding(format!(
                "{} registry used with a {} handle.",
                self.type_name, type_name
            ))
        })?;
        if set(widget, value) {
            Ok(())
        } else {
            Err(Error::binding(format!(
                "Property '{}' of {} does not accept {value:?}.",
                name.to_ascii_lowercase(),
                self.type_name
            )))
        }
    }
}
