//! Derived values

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::subscribers::{Callback, Reactive, SubscriptionId, Subscribers};

struct Inner<T> {
    derive: Box<dyn Fn() -> T>,
    value: RefCell<T>,
    subscribers: Subscribers,
    /// Unsubscribe hooks for every tracked source
    detach: RefCell<Vec<Box<dyn Fn()>>>,
}

impl<T> Inner<T> {
    fn refresh(&self) {
        let next = (self.derive)();
        *self.value.borrow_mut() = next;
        self.subscribers.notify();
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        for detach in self.detach.get_mut().drain(..) {
            detach();
        }
    }
}

/// A read-only value derived from other reactive sources.
///
/// The value is computed once on construction and again, synchronously,
/// whenever a source registered with [`Computed::track`] changes.
/// Subscribers of a computed value are notified after each re-derivation,
/// so computed values can be chained.
pub struct Computed<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// Create a derived value; call `track` for each source it reads
    pub fn new(derive: impl Fn() -> T + 'static) -> Self {
        let value = derive();
        Self {
            inner: Rc::new(Inner {
                derive: Box::new(derive),
                value: RefCell::new(value),
                subscribers: Subscribers::default(),
                detach: RefCell::new(Vec::new()),
            }),
        }
    }

    /// A derived value with no sources
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }

    /// Re-derive whenever `source` changes
    pub fn track<S>(self, source: &S) -> Self
    where
        S: Reactive + Clone + 'static,
    {
        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        let id = source.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        }));

        let source = source.clone();
        self.inner
            .detach
            .borrow_mut()
            .push(Box::new(move || {
                source.unsubscribe(id);
            }));

        // Sources may have changed between `new` and `track`
        self.inner.refresh();
        self
    }

    /// Returns the current derived value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T> Reactive for Computed<T> {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        self.inner.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.remove(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Computed")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Observable;

    #[test]
    fn test_recomputes_on_source_change() {
        let text = Observable::new("ab".to_string());
        let reader = text.clone();
        let len = Computed::new(move || reader.with(|s| s.len())).track(&text);

        assert_eq!(len.get(), 2);
        text.set("abcd".to_string());
        assert_eq!(len.get(), 4);
    }

    #[test]
    fn test_chained_derivations() {
        let a = Observable::new(3_i64);
        let reader = a.clone();
        let doubled = Computed::new(move || reader.get() * 2).track(&a);

        let upstream = doubled.clone();
        let plus_one = Computed::new(move || upstream.get() + 1).track(&doubled);

        a.set(10);
        assert_eq!(doubled.get(), 20);
        assert_eq!(plus_one.get(), 21);
    }

    #[test]
    fn test_multiple_sources() {
        let a = Observable::new(1);
        let b = Observable::new(2);
        let (ra, rb) = (a.clone(), b.clone());
        let sum = Computed::new(move || ra.get() + rb.get()).track(&a).track(&b);

        b.set(5);
        assert_eq!(sum.get(), 6);
        a.set(4);
        assert_eq!(sum.get(), 9);
    }

    #[test]
    fn test_constant() {
        let fixed = Computed::constant(Some(5_i64));
        assert_eq!(fixed.get(), Some(5));
    }

    #[test]
    fn test_drop_releases_source_subscription() {
        let a = Observable::new(1);
        let reader = a.clone();
        let derived = Computed::new(move || reader.get()).track(&a);
        assert_eq!(a.subscriber_count(), 1);

        drop(derived);
        assert_eq!(a.subscriber_count(), 0);
    }
}
