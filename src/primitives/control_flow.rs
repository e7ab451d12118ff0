//! Control Flow - list rendering from a reactive collection.
//!
//! [`Component::builder`] keeps a node's children in step with a data
//! collection:
//!
//! ```text
//! data.add("3")
//!   └── builder consumer
//!         ├── children.clear()           (REMOVE: detach + deconstruct)
//!         └── children.add_all(build(e)) (ADD: before/construct/attach/after)
//! ```
//!
//! # Pattern: Full Rebuild
//!
//! Every notification from the data collection (including the priming
//! `None` sent right after wiring) rebuilds the whole child list. The
//! children collection's own consumer then does the per-element native
//! attach and detach, so the builder never touches handles itself.
//!
//! # Ownership
//!
//! The consumer installed on `data` holds the node and the collection weakly.
//! Dropping the node stops the rebuilds; the dead consumer stays registered
//! and does nothing.

use tracing::debug;

use crate::component::Component;
use crate::error::Result;
use crate::reactive::ReactiveCollection;

impl Component {
    /// Rebuild this node's children from `data` whenever `data` changes.
    ///
    /// Each element maps to one child through `build`, in collection order.
    /// The children are built once right away.
    ///
    /// Errors raised while rebuilding (for instance
    /// [`Error::UnsupportedOperation`](crate::Error::UnsupportedOperation)
    /// when a constructed node has no container handle) are returned to
    /// whoever mutated `data`.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_tree::primitives::{text, vbox};
    /// use spark_tree::ReactiveCollection;
    ///
    /// let items = ReactiveCollection::from_items(["1".to_string(), "2".to_string()]);
    /// let list = vbox([]).builder(&items, |item| text(item)).unwrap();
    /// assert_eq!(list.children().len(), 2);
    ///
    /// items.add("3".to_string()).unwrap();
    /// assert_eq!(list.children().len(), 3);
    /// ```
    pub fn builder<E: Clone + 'static>(
        &self,
        data: &ReactiveCollection<E>,
        build: impl Fn(&E) -> Component + 'static,
    ) -> Result<Self> {
        let node = self.downgrade();
        let source = data.downgrade();
        data.subscribe(move |kind, _delta| {
            let (Some(node), Some(source)) = (node.upgrade(), source.upgrade()) else {
                return Ok(());
            };
            let elements = source.snapshot();
            debug!(
                target: "spark_tree::builder",
                node = %node,
                ?kind,
                count = elements.len(),
                "rebuilding children"
            );
            node.children().clear()?;
            node.add_all(elements.iter().map(&build))?;
            Ok(())
        });
        data.broadcast_none()?;
        Ok(self.clone())
    }
}
