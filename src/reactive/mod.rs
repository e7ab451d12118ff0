//! Reactive primitives.
//!
//! - [`ReactiveValue`]: a single-slot observable cell. Every `set` notifies
//!   all current subscribers exactly once, synchronously, in subscription
//!   order, after the slot changed.
//! - [`ReactiveCollection`]: an ordered sequence with add/remove/clear change
//!   events delivered to consumers as `(ChangeKind, delta)`.
//!
//! # Architecture
//!
//! Both types are `Rc<..>` handles over `RefCell` state, single-threaded like
//! the rest of the tree. Clones share the same cell. No borrow is held while
//! callbacks run, so a callback may freely read or mutate the value or
//! collection that notified it.
//!
//! There are no unsubscribe handles: a subscription lives as long as the
//! value it was registered on.

mod collection;
mod value;

pub use collection::{Consumer, ReactiveCollection, WeakCollection};
pub use value::{ReactiveValue, Subscriber};
