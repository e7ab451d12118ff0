//! Core types for spark-tree.
//!
//! These types flow between the reactive layer, the component tree and the
//! native widget layer. Everything the tree stores about a native property is
//! expressed as a [`Value`].

use std::fmt;

// =============================================================================
// Value - dynamic property value
// =============================================================================

/// A dynamically typed property value.
///
/// Native properties are looked up by name at runtime, so the values pushed
/// into them through bindings share one representation. Widgets convert on
/// write (see [`Value::as_text`], [`Value::as_bool`], ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// An ordered list of strings (style classes, item labels).
    List(Vec<String>),
}

impl Value {
    /// Check if this is [`Value::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Interpret the value as a boolean.
    ///
    /// Numbers are true when non-zero, text when it equals `"true"`
    /// (case-insensitive). Lists and null are never booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Value::Null | Value::List(_) => None,
        }
    }

    /// Interpret the value as an integer (floats are truncated).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null | Value::List(_) => None,
        }
    }

    /// Interpret the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(_) | Value::Null | Value::List(_) => None,
        }
    }

    /// Render the value as display text. Null renders as the empty string.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// =============================================================================
// Lifecycle Phase
// =============================================================================

/// The four ordered lifecycle phases a tree passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    BeforeConstruction,
    Construction,
    AfterConstruction,
    Deconstruction,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 4] = [
        Phase::BeforeConstruction,
        Phase::Construction,
        Phase::AfterConstruction,
        Phase::Deconstruction,
    ];

    /// The phase that must have run immediately before this one.
    pub const fn previous(self) -> Option<Phase> {
        match self {
            Phase::BeforeConstruction => None,
            Phase::Construction => Some(Phase::BeforeConstruction),
            Phase::AfterConstruction => Some(Phase::Construction),
            Phase::Deconstruction => Some(Phase::AfterConstruction),
        }
    }

    /// Lowercase name used in messages and hierarchy dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::BeforeConstruction => "before_construction",
            Phase::Construction => "construction",
            Phase::AfterConstruction => "after_construction",
            Phase::Deconstruction => "deconstruction",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Collection change kind
// =============================================================================

/// Kind of change delivered to a collection consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
    /// Explicit re-broadcast with an empty delta.
    None,
}

// =============================================================================
// Widget capabilities (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// What a native widget can do with child handles.
    ///
    /// `CONTAINER` widgets accept attached children. Containers that also set
    /// `MANAGES_CHILDREN` arrange their children structurally (regions, slots)
    /// and are never filled by the generic construction pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        const NONE = 0;
        const CONTAINER = 1 << 0;
        const MANAGES_CHILDREN = 1 << 1;
    }
}

impl Capabilities {
    /// A container whose child list the tree may rewrite.
    #[inline]
    pub fn hosts_children(self) -> bool {
        self.contains(Capabilities::CONTAINER) && !self.contains(Capabilities::MANAGES_CHILDREN)
    }
}

// =============================================================================
// Verbosity / Mode
// =============================================================================

/// Detail level for hierarchy dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Brief,
    /// Adds lifecycle timings to the root line.
    Detailed,
}

/// Application mode. Debug unlocks developer shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Release,
    Debug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from(3), Value::Int(3));
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(Value::Text("TRUE".into()).as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Text(" 42 ".into()).as_int(), Some(42));
        assert_eq!(Value::Int(2).as_float(), Some(2.0));
        assert_eq!(Value::Null.as_bool(), None);
        assert_eq!(Value::Null.as_text(), "");
        assert_eq!(Value::List(vec!["a".into(), "b".into()]).as_text(), "a,b");
    }

    #[test]
    fn test_phase_order_and_names() {
        assert!(Phase::BeforeConstruction < Phase::Construction);
        assert!(Phase::AfterConstruction < Phase::Deconstruction);
        assert_eq!(Phase::AfterConstruction.to_string(), "after_construction");
        assert_eq!(Phase::BeforeConstruction.previous(), None);
        assert_eq!(Phase::Deconstruction.previous(), Some(Phase::AfterConstruction));
    }

    #[test]
    fn test_capabilities_hosts_children() {
        assert!(Capabilities::CONTAINER.hosts_children());
        assert!(!(Capabilities::CONTAINER | Capabilities::MANAGES_CHILDREN).hosts_children());
        assert!(!Capabilities::NONE.hosts_children());
    }
}
