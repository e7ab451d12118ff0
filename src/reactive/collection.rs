//! Ordered collection with change consumers.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::types::ChangeKind;

/// Change consumer: receives the change kind and the exact delta.
///
/// A consumer may fail; the error travels back to the caller of the mutation
/// that triggered it.
pub type Consumer<T> = Rc<dyn Fn(ChangeKind, &[T]) -> Result<()>>;

type Filter<T> = Rc<dyn Fn(&T) -> bool>;

struct CollectionInner<T> {
    items: RefCell<Vec<T>>,
    filter: Option<Filter<T>>,
    consumers: RefCell<Vec<Consumer<T>>>,
}

/// An ordered sequence (duplicates allowed) with add/remove/clear events.
///
/// # Invariants
///
/// 1. Every mutation that changes membership notifies all current consumers
///    once, with the delta only (never the whole collection).
/// 2. Mutations that change nothing notify nobody.
/// 3. [`ChangeKind::None`] is only sent by [`broadcast_none`](Self::broadcast_none).
/// 4. Consumers registered after a mutation never see it.
/// 5. Elements rejected by the filter are dropped silently.
///
/// # Failure Modes
///
/// The collection itself never fails. If a consumer returns an error,
/// notification stops at that consumer and the error is returned; the
/// membership change has already happened.
pub struct ReactiveCollection<T> {
    inner: Rc<CollectionInner<T>>,
}

impl<T> Clone for ReactiveCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCollection")
            .field("items", &self.inner.items.borrow())
            .field("consumers", &self.inner.consumers.borrow().len())
            .finish()
    }
}

/// Non-owning reference to a [`ReactiveCollection`].
///
/// A consumer that reads the collection it is registered on holds one of
/// these, so the collection does not keep itself alive.
pub struct WeakCollection<T> {
    inner: Weak<CollectionInner<T>>,
}

impl<T> Clone for WeakCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakCollection<T> {
    pub fn upgrade(&self) -> Option<ReactiveCollection<T>> {
        self.inner.upgrade().map(|inner| ReactiveCollection { inner })
    }
}

impl<T: Clone + 'static> Default for ReactiveCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> FromIterator<T> for ReactiveCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<T: Clone + 'static> ReactiveCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::build(Vec::new(), None)
    }

    /// Create a collection holding `items` in order.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self::build(items.into_iter().collect(), None)
    }

    /// Create a collection that only ever admits elements passing `filter`.
    ///
    /// The filter applies to the initial items and to every later insert.
    pub fn with_filter(
        items: impl IntoIterator<Item = T>,
        filter: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        let items = items.into_iter().filter(|item| filter(item)).collect();
        Self::build(items, Some(Rc::new(filter)))
    }

    fn build(items: Vec<T>, filter: Option<Filter<T>>) -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                items: RefCell::new(items),
                filter,
                consumers: RefCell::new(Vec::new()),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// First element.
    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    /// Copy of the current contents, in order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Read the contents without copying.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// A handle that does not keep the collection alive.
    pub fn downgrade(&self) -> WeakCollection<T> {
        WeakCollection {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Check whether both handles point to the same collection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Consumers
    // =========================================================================

    /// Register a consumer. Past mutations are not replayed.
    pub fn subscribe(&self, consumer: impl Fn(ChangeKind, &[T]) -> Result<()> + 'static) {
        self.inner.consumers.borrow_mut().push(Rc::new(consumer));
    }

    pub fn consumer_count(&self) -> usize {
        self.inner.consumers.borrow().len()
    }

    /// Send `(None, [])` to every consumer.
    ///
    /// Used to prime a freshly wired consumer with an initial no-op signal.
    pub fn broadcast_none(&self) -> Result<()> {
        self.notify(ChangeKind::None, &[])
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append `item` unless the filter rejects it.
    pub fn add(&self, item: T) -> Result<()> {
        if !self.admits(&item) {
            return Ok(());
        }
        self.inner.items.borrow_mut().push(item.clone());
        self.notify(ChangeKind::Add, std::slice::from_ref(&item))
    }

    /// Append every admitted item. One notification carries the whole batch.
    pub fn add_all(&self, items: impl IntoIterator<Item = T>) -> Result<()> {
        let accepted: Vec<T> = items.into_iter().filter(|item| self.admits(item)).collect();
        if accepted.is_empty() {
            return Ok(());
        }
        self.inner.items.borrow_mut().extend(accepted.iter().cloned());
        self.notify(ChangeKind::Add, &accepted)
    }

    /// Remove every element. Notifies with the removed elements.
    pub fn clear(&self) -> Result<()> {
        let removed = std::mem::take(&mut *self.inner.items.borrow_mut());
        if removed.is_empty() {
            return Ok(());
        }
        self.notify(ChangeKind::Remove, &removed)
    }

    fn admits(&self, item: &T) -> bool {
        self.inner.filter.as_ref().is_none_or(|filter| filter(item))
    }

    fn notify(&self, kind: ChangeKind, delta: &[T]) -> Result<()> {
        let consumers: Vec<Consumer<T>> = self.inner.consumers.borrow().clone();
        for consumer in consumers {
            consumer(kind, delta)?;
        }
        Ok(())
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveCollection<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.inner.items.borrow().contains(item)
    }

    /// Position of the first element equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.inner.items.borrow().iter().position(|existing| existing == item)
    }

    /// Remove the first element equal to `item`.
    ///
    /// Returns `Ok(false)` without notifying when nothing matched.
    pub fn remove(&self, item: &T) -> Result<bool> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            match items.iter().position(|existing| existing == item) {
                Some(index) => items.remove(index),
                None => return Ok(false),
            }
        };
        self.notify(ChangeKind::Remove, std::slice::from_ref(&removed))?;
        Ok(true)
    }

    /// Remove every element equal to any of `items`.
    pub fn remove_all(&self, items: &[T]) -> Result<()> {
        let removed = {
            let mut current = self.inner.items.borrow_mut();
            let mut removed = Vec::new();
            current.retain(|existing| {
                if items.contains(existing) {
                    removed.push(existing.clone());
                    false
                } else {
                    true
                }
            });
            removed
        };
        if removed.is_empty() {
            return Ok(());
        }
        self.notify(ChangeKind::Remove, &removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    type Log = Rc<RefCell<Vec<(ChangeKind, Vec<&'static str>)>>>;

    fn recording(collection: &ReactiveCollection<&'static str>) -> Log {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        collection.subscribe(move |kind, delta| {
            log_clone.borrow_mut().push((kind, delta.to_vec()));
            Ok(())
        });
        log
    }

    #[test]
    fn test_add_then_remove_notifies_twice() {
        let collection = ReactiveCollection::new();
        let log = recording(&collection);

        collection.add("x").unwrap();
        assert!(collection.remove(&"x").unwrap());

        assert_eq!(
            *log.borrow(),
            vec![(ChangeKind::Add, vec!["x"]), (ChangeKind::Remove, vec!["x"])]
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn test_delta_not_whole_collection() {
        let collection = ReactiveCollection::from_items(["a", "b"]);
        let log = recording(&collection);

        collection.add_all(["c", "d"]).unwrap();
        assert_eq!(*log.borrow(), vec![(ChangeKind::Add, vec!["c", "d"])]);
        assert_eq!(collection.snapshot(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_no_op_mutations_are_silent() {
        let collection = ReactiveCollection::<&'static str>::new();
        let log = recording(&collection);

        assert!(!collection.remove(&"missing").unwrap());
        collection.remove_all(&["missing"]).unwrap();
        collection.clear().unwrap();
        collection.add_all(Vec::new()).unwrap();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_filter_drops_silently() {
        let collection = ReactiveCollection::with_filter(["keep", "", "also"], |s: &&str| !s.is_empty());
        assert_eq!(collection.snapshot(), vec!["keep", "also"]);

        let log = recording(&collection);
        collection.add("").unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_duplicates_and_remove_all() {
        let collection = ReactiveCollection::from_items(["a", "b", "a", "c"]);
        let log = recording(&collection);

        collection.remove_all(&["a"]).unwrap();
        assert_eq!(collection.snapshot(), vec!["b", "c"]);
        assert_eq!(*log.borrow(), vec![(ChangeKind::Remove, vec!["a", "a"])]);
    }

    #[test]
    fn test_clear_reports_removed_elements() {
        let collection = ReactiveCollection::from_items(["a", "b"]);
        let log = recording(&collection);

        collection.clear().unwrap();
        assert_eq!(*log.borrow(), vec![(ChangeKind::Remove, vec!["a", "b"])]);
    }

    #[test]
    fn test_broadcast_none_has_empty_delta() {
        let collection = ReactiveCollection::from_items(["a"]);
        let log = recording(&collection);

        collection.broadcast_none().unwrap();
        assert_eq!(*log.borrow(), vec![(ChangeKind::None, vec![])]);
    }

    #[test]
    fn test_late_consumer_not_replayed() {
        let collection = ReactiveCollection::new();
        collection.add("a").unwrap();
        let log = recording(&collection);
        assert!(log.borrow().is_empty());

        collection.add("b").unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_consumer_error_propagates() {
        let collection = ReactiveCollection::new();
        collection.subscribe(|_, _| Err(Error::unsupported("nope")));

        let err = collection.add("a").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
        // Membership changed before the consumer ran.
        assert_eq!(collection.snapshot(), vec!["a"]);
    }

    #[test]
    fn test_consumer_may_read_during_notification() {
        let collection = ReactiveCollection::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let collection_clone = collection.clone();
        let seen_clone = seen.clone();
        collection.subscribe(move |_, _| {
            seen_clone.borrow_mut().push(collection_clone.len());
            Ok(())
        });

        collection.add(1).unwrap();
        collection.add(2).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_weak_collection_does_not_keep_alive() {
        let collection: ReactiveCollection<&'static str> = ReactiveCollection::from_items(["a"]);
        let weak = collection.downgrade();
        assert_eq!(weak.upgrade().unwrap().snapshot(), vec!["a"]);
        assert!(weak.upgrade().unwrap().ptr_eq(&collection));
        assert!(!collection.ptr_eq(&ReactiveCollection::from_items(["a"])));

        drop(collection);
        assert!(weak.upgrade().is_none());
    }
}
