//! Component tree nodes.
//!
//! A [`Component`] is a node of the declarative tree. It owns:
//! - an optional native [`Handle`] (absent until construction for wrappers)
//! - a [`ReactiveCollection`] of child components
//! - the reactive values currently bound to native properties
//! - bindings recorded before a handle existed (resolved in
//!   `after_construction`)
//! - a weak back-reference to its parent
//!
//! # Architecture
//!
//! ```text
//! Component ──Rc──► ComponentInner
//!                     ├── handle: Option<Handle>
//!                     ├── children: ReactiveCollection<Component> ──consumer──► this node
//!                     ├── parent: Weak<ComponentInner>  (never keeps the parent alive)
//!                     ├── bindings: property → ReactiveValue<Value>
//!                     └── deferred: [(property, source)]
//! ```
//!
//! Every node is the consumer of its own children collection. Until the node
//! has been constructed once, adding or removing children only maintains
//! parent links. Afterwards each change is pushed into the native container:
//! added children run the full lifecycle and get attached, removed children
//! get detached and deconstructed.

mod binding;
mod hierarchy;
mod lifecycle;
mod search;

pub use hierarchy::Hierarchy;
pub use lifecycle::Lifecycle;
pub use search::{Findable, Scope};

pub(crate) use binding::DeferredBinding;
pub(crate) use hierarchy::stringify_only_child;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::engine::Handle;
use crate::error::{Error, Result};
use crate::pipeline::{Root, RootInner};
use crate::reactive::{ReactiveCollection, ReactiveValue};
use crate::types::{ChangeKind, Value};

pub(crate) struct ComponentInner {
    handle: RefCell<Option<Handle>>,
    children: ReactiveCollection<Component>,
    parent: RefCell<Weak<ComponentInner>>,
    /// Set only on the hidden top node a [`Root`] wraps.
    root: RefCell<Weak<RootInner>>,
    bindings: RefCell<HashMap<String, ReactiveValue<Value>>>,
    deferred: RefCell<Vec<DeferredBinding>>,
    /// Construction ran at least once; child changes now reach the native layer.
    constructed: Cell<bool>,
    /// The handle was adopted from the single child.
    collapsed: Cell<bool>,
}

/// A node of the declarative tree.
///
/// Cloning gives another reference to the same node. Equality is identity.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

/// Non-owning reference to a [`Component`], for callbacks stored on data the
/// component outlives.
#[derive(Clone)]
pub(crate) struct WeakComponent(Weak<ComponentInner>);

impl WeakComponent {
    pub(crate) fn upgrade(&self) -> Option<Component> {
        self.0.upgrade().map(|inner| Component { inner })
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("label", &self.label())
            .field("children", &self.inner.children.len())
            .field("constructed", &self.inner.constructed.get())
            .finish()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Component {
    /// Create a node with an optional handle and initial children.
    ///
    /// Children that already belong to another live parent are skipped.
    pub fn new(handle: Option<Handle>, children: impl IntoIterator<Item = Component>) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<ComponentInner>| {
            let this = weak.clone();
            let accepted: Vec<Component> = children
                .into_iter()
                .filter(|child| {
                    let free = child.parent_inner().is_none() && child.root_inner().is_none();
                    if !free {
                        warn!(target: "spark_tree::component", child = %child, "child already has a parent or is a root; skipped");
                    }
                    free
                })
                .collect();
            for child in &accepted {
                *child.inner.parent.borrow_mut() = weak.clone();
            }

            let children = ReactiveCollection::with_filter(accepted, move |child: &Component| {
                !std::ptr::eq(Rc::as_ptr(&child.inner), this.as_ptr())
            });

            let consumer = weak.clone();
            children.subscribe(move |kind, delta| match consumer.upgrade() {
                Some(inner) => Component { inner }.on_children_changed(kind, delta),
                None => Ok(()),
            });

            ComponentInner {
                handle: RefCell::new(handle),
                children,
                parent: RefCell::new(Weak::new()),
                root: RefCell::new(Weak::new()),
                bindings: RefCell::new(HashMap::new()),
                deferred: RefCell::new(Vec::new()),
                constructed: Cell::new(false),
                collapsed: Cell::new(false),
            }
        });
        Self { inner }
    }

    /// Node wrapping `handle`, without children.
    pub fn leaf(handle: Handle) -> Self {
        Self::new(Some(handle), [])
    }

    /// Handle-less node around exactly one child. Collapses onto the child's
    /// handle during construction.
    pub fn wrap(child: Component) -> Self {
        Self::new(None, [child])
    }

    pub(crate) fn downgrade(&self) -> WeakComponent {
        WeakComponent(Rc::downgrade(&self.inner))
    }

    pub(crate) fn attach_root(&self, root: &Rc<RootInner>) {
        *self.inner.root.borrow_mut() = Rc::downgrade(root);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The native handle, if one exists yet.
    pub fn handle(&self) -> Option<Handle> {
        self.inner.handle.borrow().clone()
    }

    pub(crate) fn require_handle(&self) -> Result<Handle> {
        self.handle().ok_or_else(|| Error::no_handle(&self.label()))
    }

    /// The children collection. Mutating it directly behaves like
    /// [`add`](Self::add) without the parent checks.
    pub fn children(&self) -> &ReactiveCollection<Component> {
        &self.inner.children
    }

    /// Whether construction has run on this node.
    pub fn is_constructed(&self) -> bool {
        self.inner.constructed.get()
    }

    /// Whether the handle was adopted from the single child.
    pub fn is_collapsed(&self) -> bool {
        self.inner.collapsed.get()
    }

    pub fn parent(&self) -> Option<Component> {
        self.parent_inner().map(|inner| Component { inner })
    }

    fn parent_inner(&self) -> Option<Rc<ComponentInner>> {
        self.inner.parent.borrow().upgrade()
    }

    fn root_inner(&self) -> Option<Rc<RootInner>> {
        self.inner.root.borrow().upgrade()
    }

    /// Label used in dumps and messages: widget type, `#id`, `|classes`.
    pub fn label(&self) -> String {
        match self.handle() {
            Some(handle) => {
                let mut label = handle.type_name().to_string();
                if let Some(id) = handle.id() {
                    label.push('#');
                    label.push_str(&id);
                }
                let classes = handle.classes();
                if !classes.is_empty() {
                    label.push('|');
                    label.push_str(&classes.join(","));
                }
                label
            }
            None => "Component".to_string(),
        }
    }

    /// The tree's [`Root`].
    ///
    /// Follows parent links up to the parentless node, which must be the node
    /// a `Root` wraps.
    pub fn get_root(&self) -> Result<Root> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.root_inner().map(Root::from_inner).ok_or_else(|| {
            Error::illegal_state(format!(
                "Component '{}' should be Root or is missing a parent component.",
                current.label()
            ))
        })
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Append a child.
    ///
    /// Fails with [`Error::IllegalState`] if the child already has a parent
    /// (this node included), is this node or one of its ancestors, or is a root.
    /// Once constructed, only a node whose own handle hosts children accepts
    /// new ones; anything else fails with [`Error::UnsupportedOperation`].
    pub fn add(&self, child: Component) -> Result<Self> {
        self.check_mutable()?;
        self.check_adoptable(&child)?;
        self.inner.children.add(child)?;
        Ok(self.clone())
    }

    /// Append several children with one change notification.
    pub fn add_all(&self, children: impl IntoIterator<Item = Component>) -> Result<Self> {
        let children: Vec<Component> = children.into_iter().collect();
        self.check_mutable()?;
        for (index, child) in children.iter().enumerate() {
            self.check_adoptable(child)?;
            if children[..index].contains(child) {
                return Err(Error::illegal_state(format!(
                    "Component '{}' appears twice in one batch.",
                    child.label()
                )));
            }
        }
        self.inner.children.add_all(children)?;
        Ok(self.clone())
    }

    /// Remove the first occurrence of `child`. Absent children are ignored.
    pub fn remove(&self, child: &Component) -> Result<Self> {
        if self.inner.children.contains(child) {
            self.check_mutable()?;
        }
        self.inner.children.remove(child)?;
        Ok(self.clone())
    }

    /// Remove every occurrence of each of `children`.
    pub fn remove_all(&self, children: &[Component]) -> Result<Self> {
        if children.iter().any(|child| self.inner.children.contains(child)) {
            self.check_mutable()?;
        }
        self.inner.children.remove_all(children)?;
        Ok(self.clone())
    }

    /// Reject membership changes the native tree could not mirror.
    fn check_mutable(&self) -> Result<()> {
        if self.is_constructed() {
            self.host_handle()?;
        }
        Ok(())
    }

    fn check_adoptable(&self, child: &Component) -> Result<()> {
        if child.root_inner().is_some() {
            return Err(Error::illegal_state("Root cannot have a parent."));
        }
        if let Some(parent) = child.parent() {
            if parent != *self {
                return Err(Error::illegal_state(format!(
                    "Component '{}' already has parent '{}'.",
                    child.label(),
                    parent.label()
                )));
            }
        }
        if self.inner.children.contains(child) {
            return Err(Error::illegal_state(format!(
                "Component '{}' is already a child of '{}'.",
                child.label(),
                self.label()
            )));
        }
        let mut ancestor = Some(self.clone());
        while let Some(node) = ancestor {
            if node == *child {
                return Err(Error::illegal_state(format!(
                    "Component '{}' cannot be added below itself.",
                    child.label()
                )));
            }
            ancestor = node.parent();
        }
        Ok(())
    }

    fn on_children_changed(&self, kind: ChangeKind, delta: &[Component]) -> Result<()> {
        match kind {
            ChangeKind::None => Ok(()),
            ChangeKind::Add => {
                for child in delta {
                    *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
                }
                if self.is_constructed() {
                    // Duplicates pushed straight into the collection are mounted once.
                    let mut fresh: Vec<Component> = Vec::new();
                    for child in delta {
                        if !child.is_constructed() && !fresh.contains(child) {
                            fresh.push(child.clone());
                        }
                    }
                    self.mount_children(&fresh)?;
                }
                Ok(())
            }
            ChangeKind::Remove => {
                for child in delta {
                    if !self.inner.children.contains(child) {
                        *child.inner.parent.borrow_mut() = Weak::new();
                    }
                }
                if self.is_constructed() {
                    let gone: Vec<Component> = delta
                        .iter()
                        .filter(|child| !self.inner.children.contains(child))
                        .cloned()
                        .collect();
                    self.unmount_children(&gone)?;
                }
                Ok(())
            }
        }
    }

    fn host_handle(&self) -> Result<Handle> {
        // An adopted handle belongs to the single child, not to this node.
        if self.is_collapsed() {
            return Err(Error::unsupported(format!(
                "Component '{}' shares its only child's handle and cannot change children.",
                self.label()
            )));
        }
        match self.handle() {
            Some(handle) if handle.capabilities().hosts_children() => Ok(handle),
            _ => Err(Error::unsupported(format!(
                "Component '{}' cannot host child components.",
                self.label()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Text, VBox};

    fn text(content: &str) -> Component {
        Component::leaf(Handle::new(Text::new(content)))
    }

    #[test]
    fn test_new_sets_parents() {
        let a = text("a");
        let b = text("b");
        let parent = Component::new(Some(Handle::new(VBox::new())), [a.clone(), b.clone()]);

        assert_eq!(a.parent(), Some(parent.clone()));
        assert_eq!(b.parent(), Some(parent.clone()));
        assert_eq!(parent.children().snapshot(), vec![a, b]);
        assert!(parent.parent().is_none());
    }

    #[test]
    fn test_parent_link_is_weak() {
        let child = text("a");
        {
            let _parent = Component::wrap(child.clone());
            assert!(child.parent().is_some());
        }
        assert!(child.parent().is_none());
    }

    #[test]
    fn test_child_with_parent_skipped_by_new() {
        let child = text("a");
        let first = Component::wrap(child.clone());
        let second = Component::wrap(child.clone());

        assert_eq!(first.children().len(), 1);
        assert!(second.children().is_empty());
        assert_eq!(child.parent(), Some(first));
    }

    #[test]
    fn test_add_rejects_second_parent_and_cycles() {
        let child = text("a");
        let first = Component::new(Some(Handle::new(VBox::new())), []);
        let second = Component::new(Some(Handle::new(VBox::new())), []);

        first.add(child.clone()).unwrap();
        assert!(matches!(second.add(child.clone()), Err(Error::IllegalState(_))));
        assert!(matches!(first.add(first.clone()), Err(Error::IllegalState(_))));

        let inner = Component::new(Some(Handle::new(VBox::new())), []);
        first.add(inner.clone()).unwrap();
        assert!(matches!(inner.add(first.clone()), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_add_rejects_existing_member() {
        let child = text("a");
        let parent = Component::wrap(child.clone());

        assert_eq!(
            parent.add(child.clone()).unwrap_err(),
            Error::illegal_state("Component 'Text' is already a child of 'Component'.")
        );
        assert_eq!(parent.children().len(), 1);

        let other = text("b");
        assert!(matches!(
            parent.add_all([other.clone(), other.clone()]),
            Err(Error::IllegalState(_))
        ));
        assert_eq!(parent.children().len(), 1);
        assert!(other.parent().is_none());
    }

    #[test]
    fn test_self_never_in_children() {
        let node = Component::new(Some(Handle::new(VBox::new())), []);
        node.children().add(node.clone()).unwrap();
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_remove_clears_parent() {
        let child = text("a");
        let parent = Component::wrap(child.clone());
        parent.remove(&child).unwrap();
        assert!(child.parent().is_none());
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_get_root_without_root_fails() {
        let child = text("a");
        let _parent = Component::wrap(child.clone());
        assert!(matches!(child.get_root(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_label() {
        let node = text("a");
        let handle = node.handle().unwrap();
        handle.set_id(Some("title".into()));
        handle.add_class("big");
        handle.add_class("bold");
        assert_eq!(node.label(), "Text#title|big,bold");
        assert_eq!(Component::new(None, []).label(), "Component");
    }
}
