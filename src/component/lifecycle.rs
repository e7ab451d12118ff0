//! Four-phase lifecycle and the children change-consumer.

use tracing::trace;

use crate::engine::Handle;
use crate::error::Result;

use super::Component;

/// The lifecycle every tree node goes through.
///
/// Phases run in order: `before_construction`, `construct`,
/// `after_construction`, and finally `deconstruct`. Recursion into children
/// is pre-order and follows the children collection's order.
pub trait Lifecycle {
    /// Visit the subtree before any native work.
    fn before_construction(&self) -> Result<()>;

    /// Build the native subtree and return this node's handle.
    fn construct(&self) -> Result<Option<Handle>>;

    /// Resolve bindings that were waiting for a handle.
    fn after_construction(&self) -> Result<()>;

    /// Tear the subtree down.
    fn deconstruct(&self) -> Result<()>;
}

impl Lifecycle for Component {
    fn before_construction(&self) -> Result<()> {
        for child in self.inner.children.snapshot() {
            child.before_construction()?;
        }
        Ok(())
    }

    fn construct(&self) -> Result<Option<Handle>> {
        let children = self.inner.children.snapshot();
        let handle = match self.handle() {
            Some(handle) if handle.capabilities().hosts_children() => {
                handle.clear_children()?;
                for child in &children {
                    attach_constructed(&handle, child)?;
                }
                Some(handle)
            }
            Some(handle) => {
                // Leaves and self-managed containers place nothing generically.
                for child in &children {
                    child.construct()?;
                }
                Some(handle)
            }
            None if children.len() == 1 => {
                let adopted = children[0].construct()?;
                self.inner.collapsed.set(adopted.is_some());
                *self.inner.handle.borrow_mut() = adopted.clone();
                adopted
            }
            None => None,
        };
        trace!(target: "spark_tree::component", node = %self, children = children.len(), "constructed");
        self.inner.constructed.set(true);
        Ok(handle)
    }

    fn after_construction(&self) -> Result<()> {
        self.resolve_deferred()?;
        for child in self.inner.children.snapshot() {
            child.after_construction()?;
        }
        Ok(())
    }

    fn deconstruct(&self) -> Result<()> {
        for child in self.inner.children.snapshot() {
            child.deconstruct()?;
        }
        self.inner.constructed.set(false);
        Ok(())
    }
}

/// Construct `child` and append its handle to `parent` unless it is absent
/// or `parent` itself (a collapsed child sharing the parent's handle).
fn attach_constructed(parent: &Handle, child: &Component) -> Result<()> {
    if let Some(native) = child.construct()? {
        if !native.ptr_eq(parent) {
            parent.attach(&native)?;
        }
    }
    Ok(())
}

impl Component {
    /// Bring freshly added children into the live native tree.
    ///
    /// All children of the batch run `before_construction`, then all are
    /// constructed and attached in order, then all run `after_construction`.
    pub(super) fn mount_children(&self, added: &[Component]) -> Result<()> {
        let host = self.host_handle()?;
        for child in added {
            child.before_construction()?;
        }
        for child in added {
            attach_constructed(&host, child)?;
        }
        for child in added {
            child.after_construction()?;
        }
        Ok(())
    }

    /// Detach removed children from the native container, then deconstruct them.
    pub(super) fn unmount_children(&self, removed: &[Component]) -> Result<()> {
        let host = self.host_handle()?;
        for child in removed {
            if let Some(native) = child.handle() {
                host.detach(&native)?;
            }
        }
        for child in removed {
            child.deconstruct()?;
        }
        Ok(())
    }
}
