//! Error taxonomy for tree assembly, lifecycle and bindings.
//!
//! Every error here is unrecoverable at the point it is raised and travels
//! back to whoever triggered the lifecycle call, binding or mutation. There is
//! no internal retry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation needs a native handle or lifecycle state that is not
    /// present yet, or a phase was re-entered.
    #[error("Lifecycle violation: {0}")]
    Lifecycle(String),

    #[error("Property '{property}' does not exist on {widget}.")]
    UnknownProperty { property: String, widget: String },

    /// A deferred binding could not be resolved, or its target did not accept it.
    #[error("Binding failed: {0}")]
    Binding(String),

    /// A structural invariant of the tree does not hold.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl Error {
    pub(crate) fn lifecycle(message: impl Into<String>) -> Self {
        Error::Lifecycle(message.into())
    }

    pub(crate) fn binding(message: impl Into<String>) -> Self {
        Error::Binding(message.into())
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Error::IllegalState(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedOperation(message.into())
    }

    pub(crate) fn unknown_property(property: &str, widget: &str) -> Self {
        Error::UnknownProperty {
            property: property.to_ascii_lowercase(),
            widget: widget.to_string(),
        }
    }

    /// Missing native handle.
    pub(crate) fn no_handle(component: &str) -> Self {
        Error::Lifecycle(format!("Component '{component}' has no native handle yet."))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_property_is_lowercased() {
        let err = Error::unknown_property("PromptText", "Text");
        assert_eq!(
            err.to_string(),
            "Property 'prompttext' does not exist on Text."
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::lifecycle("Lifecycle has not yet started.").to_string(),
            "Lifecycle violation: Lifecycle has not yet started."
        );
        assert!(matches!(Error::no_handle("Component"), Error::Lifecycle(_)));
    }
}
