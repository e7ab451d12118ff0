//! Tree search by identity, style class and widget type.

use crate::engine::Widget;
use crate::error::Result;

use super::Component;

/// Where a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// This node and its descendants.
    #[default]
    Subtree,
    /// The whole tree, starting from the root.
    Tree,
}

/// Lookup of components in a tree.
///
/// A node matches on its own handle. Wrappers that adopted their single
/// child's handle never match, so each widget is found once, on the node
/// that owns it.
pub trait Findable {
    /// First node in pre-order whose id equals `id`.
    fn find_by_id(&self, id: &str, scope: Scope) -> Result<Option<Component>>;

    /// Every node carrying the style class `class`, in pre-order.
    fn find_by_class(&self, class: &str, scope: Scope) -> Result<Vec<Component>>;

    /// The nodes found for each of `ids`, in the order of `ids`. Ids nobody
    /// carries are skipped.
    fn find_many(&self, ids: &[&str], scope: Scope) -> Result<Vec<Component>> {
        let mut found = Vec::new();
        for id in ids {
            if let Some(component) = self.find_by_id(id, scope)? {
                found.push(component);
            }
        }
        Ok(found)
    }
}

impl Findable for Component {
    fn find_by_id(&self, id: &str, scope: Scope) -> Result<Option<Component>> {
        if self.owns_id(id) {
            return Ok(Some(self.clone()));
        }
        match scope {
            Scope::Tree => self.get_root()?.find_by_id(id, Scope::Subtree),
            Scope::Subtree => Ok(self
                .descendants()
                .into_iter()
                .find(|node| node.owns_id(id))),
        }
    }

    fn find_by_class(&self, class: &str, scope: Scope) -> Result<Vec<Component>> {
        match scope {
            Scope::Tree => self.get_root()?.find_by_class(class, Scope::Subtree),
            Scope::Subtree => Ok(self
                .walk()
                .into_iter()
                .filter(|node| node.owned_handle().is_some_and(|h| h.has_class(class)))
                .collect()),
        }
    }
}

impl Component {
    /// All nodes below this one, pre-order, in children order.
    pub fn descendants(&self) -> Vec<Component> {
        let mut nodes = self.walk();
        nodes.remove(0);
        nodes
    }

    /// Every node in this subtree whose handle is a `W`.
    pub fn find_by_widget<W: Widget>(&self) -> Vec<Component> {
        self.walk()
            .into_iter()
            .filter(|node| node.owned_handle().is_some_and(|h| h.is::<W>()))
            .collect()
    }

    /// This node followed by its descendants, pre-order.
    pub(crate) fn walk(&self) -> Vec<Component> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            let mut children = node.inner.children.snapshot();
            children.reverse();
            stack.extend(children);
            nodes.push(node);
        }
        nodes
    }

    fn owned_handle(&self) -> Option<crate::engine::Handle> {
        if self.is_collapsed() {
            None
        } else {
            self.handle()
        }
    }

    fn owns_id(&self, id: &str) -> bool {
        self.owned_handle()
            .and_then(|handle| handle.id())
            .is_some_and(|own| own == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Lifecycle;
    use crate::engine::Handle;
    use crate::error::Error;
    use crate::widgets::{Button, Text, VBox};

    fn text(content: &str, id: &str) -> Component {
        let node = Component::leaf(Handle::new(Text::new(content)));
        node.set_id(id).unwrap();
        node
    }

    fn tree() -> (Component, Component, Component, Component) {
        let a = text("a", "a");
        let b = text("b", "b");
        let inner = Component::new(Some(Handle::new(VBox::new())), [b.clone()]);
        let top = Component::new(Some(Handle::new(VBox::new())), [a.clone(), inner.clone()]);
        (top, a, inner, b)
    }

    #[test]
    fn test_find_by_id_subtree() {
        let (top, a, inner, b) = tree();
        assert_eq!(top.find_by_id("b", Scope::Subtree).unwrap(), Some(b.clone()));
        assert_eq!(top.find_by_id("a", Scope::Subtree).unwrap(), Some(a));
        assert_eq!(inner.find_by_id("a", Scope::Subtree).unwrap(), None);
        assert_eq!(b.find_by_id("b", Scope::Subtree).unwrap(), Some(b));
        assert_eq!(top.find_by_id("zzz", Scope::Subtree).unwrap(), None);
    }

    #[test]
    fn test_tree_scope_needs_root() {
        let (_top, a, _, _) = tree();
        assert!(matches!(a.find_by_id("b", Scope::Tree), Err(Error::IllegalState(_))));
        // Own identity matches before the root is consulted.
        assert_eq!(a.find_by_id("a", Scope::Tree).unwrap(), Some(a));
    }

    #[test]
    fn test_collapsed_wrapper_is_not_a_match() {
        let child = text("x", "x");
        let wrapper = Component::wrap(child.clone());
        wrapper.construct().unwrap();

        assert_eq!(wrapper.find_by_id("x", Scope::Subtree).unwrap(), Some(child.clone()));
        assert_eq!(wrapper.find_by_widget::<Text>(), vec![child]);
    }

    #[test]
    fn test_find_by_class_collects_all() {
        let (top, a, _, b) = tree();
        a.add_class("item").unwrap();
        b.add_class("item").unwrap();
        b.add_class("last").unwrap();

        assert_eq!(top.find_by_class("item", Scope::Subtree).unwrap(), vec![a, b.clone()]);
        assert_eq!(top.find_by_class("last", Scope::Subtree).unwrap(), vec![b]);
        assert!(top.find_by_class("none", Scope::Subtree).unwrap().is_empty());
    }

    #[test]
    fn test_find_many_skips_missing() {
        let (top, a, _, b) = tree();
        assert_eq!(
            top.find_many(&["b", "missing", "a"], Scope::Subtree).unwrap(),
            vec![b, a]
        );
    }

    #[test]
    fn test_descendants_pre_order() {
        let (top, a, inner, b) = tree();
        assert_eq!(top.descendants(), vec![a, inner, b]);
    }

    #[test]
    fn test_find_by_widget() {
        let (top, _, _, _) = tree();
        assert_eq!(top.find_by_widget::<VBox>().len(), 2);
        assert_eq!(top.find_by_widget::<Text>().len(), 2);
        assert!(top.find_by_widget::<Button>().is_empty());
    }
}
