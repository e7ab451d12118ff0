//! Single-slot observable cell.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Subscriber callback. Receives the new value (`None` when cleared).
pub type Subscriber<V> = Rc<dyn Fn(Option<&V>)>;

struct ValueInner<V> {
    value: RefCell<Option<V>>,
    subscribers: RefCell<Vec<Subscriber<V>>>,
}

/// A nullable value with ordered change subscribers.
///
/// Cloning creates another handle to the **same** cell.
///
/// # Example
///
/// ```
/// use spark_tree::ReactiveValue;
///
/// let counter = ReactiveValue::new(0);
/// let label = ReactiveValue::<String>::empty();
/// label.compute(&counter, |c| format!("Value: {}", c.copied().unwrap_or_default()));
///
/// counter.update(|c| c.unwrap_or_default() + 1);
/// assert_eq!(label.get().as_deref(), Some("Value: 1"));
/// ```
pub struct ReactiveValue<V> {
    inner: Rc<ValueInner<V>>,
}

impl<V> Clone for ReactiveValue<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ReactiveValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveValue")
            .field("value", &self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<V: Clone + 'static> Default for ReactiveValue<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Clone + 'static> ReactiveValue<V> {
    /// Create a cell holding `value`.
    pub fn new(value: V) -> Self {
        Self::with_slot(Some(value))
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::with_slot(None)
    }

    fn with_slot(value: Option<V>) -> Self {
        Self {
            inner: Rc::new(ValueInner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> Option<V> {
        self.inner.value.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.inner.value.borrow().as_ref())
    }

    /// Replace the value and notify every subscriber with the new value.
    pub fn set(&self, value: impl Into<Option<V>>) {
        let value = value.into();
        *self.inner.value.borrow_mut() = value.clone();
        self.notify(value.as_ref());
    }

    /// Read, transform, store and notify.
    pub fn update(&self, f: impl FnOnce(Option<V>) -> V) {
        let next = f(self.get());
        self.set(next);
    }

    /// Append a subscriber. It is not called for the current value.
    pub fn subscribe(&self, subscriber: impl Fn(Option<&V>) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(subscriber));
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Derive this value from `source` (one hop).
    ///
    /// Overwrites this value with `combine(source)` immediately and again on
    /// every later change of `source`. Changes to whatever `source` itself
    /// computes from are only seen once they reach `source`.
    pub fn compute<S: Clone + 'static>(
        &self,
        source: &ReactiveValue<S>,
        combine: impl Fn(Option<&S>) -> V + 'static,
    ) {
        let combine: Rc<dyn Fn(Option<&S>) -> V> = Rc::new(combine);
        let initial = source.with(|s| combine(s));
        self.set(initial);

        let target = self.clone();
        source.subscribe(move |s| target.set(combine(s)));
    }

    /// Check whether both handles point to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, value: Option<&V>) {
        // Snapshot: subscribers added during notification wait for the next change.
        let subscribers: Vec<Subscriber<V>> = self.inner.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_set() {
        let value = ReactiveValue::new(1);
        assert_eq!(value.get(), Some(1));
        value.set(2);
        assert_eq!(value.get(), Some(2));
        value.set(None);
        assert_eq!(value.get(), None);
    }

    #[test]
    fn test_subscribers_called_once_in_order() {
        let value = ReactiveValue::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            value.subscribe(move |v| log.borrow_mut().push((tag, v.copied())));
        }

        value.set(7);
        assert_eq!(
            *log.borrow(),
            vec![("a", Some(7)), ("b", Some(7)), ("c", Some(7))]
        );
    }

    #[test]
    fn test_subscriber_sees_updated_slot() {
        let value = ReactiveValue::new(String::from("old"));
        let seen = Rc::new(RefCell::new(None));

        let value_clone = value.clone();
        let seen_clone = seen.clone();
        value.subscribe(move |_| *seen_clone.borrow_mut() = value_clone.get());

        value.set("new".to_string());
        assert_eq!(seen.borrow().as_deref(), Some("new"));
    }

    #[test]
    fn test_update() {
        let counter = ReactiveValue::new(41);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        counter.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        counter.update(|c| c.unwrap_or_default() + 1);
        assert_eq!(counter.get(), Some(42));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_late_subscriber_not_replayed() {
        let value = ReactiveValue::new(1);
        value.set(2);

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        value.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_compute_is_immediate_and_synchronous() {
        let source = ReactiveValue::new(2);
        let doubled = ReactiveValue::<i32>::empty();
        doubled.compute(&source, |s| s.copied().unwrap_or_default() * 2);
        assert_eq!(doubled.get(), Some(4));

        source.set(10);
        assert_eq!(doubled.get(), Some(20));
    }

    #[test]
    fn test_compute_is_one_hop() {
        let a = ReactiveValue::new(1);
        let b = ReactiveValue::<i32>::empty();
        let c = ReactiveValue::<i32>::empty();
        b.compute(&a, |v| v.copied().unwrap_or_default() + 1);
        c.compute(&b, |v| v.copied().unwrap_or_default() * 10);
        assert_eq!(c.get(), Some(20));

        // c follows b, b follows a
        a.set(4);
        assert_eq!(b.get(), Some(5));
        assert_eq!(c.get(), Some(50));

        // Writing b directly is seen by c only.
        b.set(0);
        assert_eq!(a.get(), Some(4));
        assert_eq!(c.get(), Some(0));
    }

    #[test]
    fn test_reentrant_set_from_subscriber() {
        let value = ReactiveValue::new(0);
        let value_clone = value.clone();
        value.subscribe(move |v| {
            if v.copied() == Some(1) {
                value_clone.set(2);
            }
        });

        value.set(1);
        assert_eq!(value.get(), Some(2));
    }

    #[test]
    fn test_clone_shares_cell() {
        let a = ReactiveValue::new("x");
        let b = a.clone();
        b.set("y");
        assert_eq!(a.get(), Some("y"));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&ReactiveValue::new("y")));
    }
}
