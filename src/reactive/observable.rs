//! Observable single values and sequences

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::subscribers::{Callback, Reactive, SubscriptionId, Subscribers};

struct Inner<T> {
    value: RefCell<T>,
    subscribers: Subscribers,
}

/// A single value with change notification.
///
/// Every `set` notifies, even when the new value equals the old one.
pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create an observable seeded with `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without copying it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Stores `value` and notifies subscribers
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.subscribers.notify();
    }

    /// Mutates the value in place and notifies subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.inner.subscribers.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl<T> Reactive for Observable<T> {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        self.inner.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.remove(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

/// A sequence with change notification.
pub struct ObservableVec<T> {
    inner: Rc<Inner<Vec<T>>>,
}

impl<T> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + 'static> ObservableVec<T> {
    /// Create a sequence seeded with `items`
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(items),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Returns a copy of the items
    pub fn get(&self) -> Vec<T> {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn len(&self) -> usize {
        self.inner.value.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.value.borrow().is_empty()
    }

    /// Returns a copy of the item at `index`
    pub fn item(&self, index: usize) -> Option<T> {
        self.inner.value.borrow().get(index).cloned()
    }

    /// Replaces all items
    pub fn set(&self, items: Vec<T>) {
        *self.inner.value.borrow_mut() = items;
        self.inner.subscribers.notify();
    }

    pub fn push(&self, item: T) {
        self.inner.value.borrow_mut().push(item);
        self.inner.subscribers.notify();
    }

    /// Appends all items with a single notification
    pub fn extend(&self, items: impl IntoIterator<Item = T>) {
        self.inner.value.borrow_mut().extend(items);
        self.inner.subscribers.notify();
    }

    /// Keeps items matching `keep`; notifies only if something was removed.
    /// Returns the number of removed items.
    pub fn retain(&self, keep: impl FnMut(&T) -> bool) -> usize {
        let removed = {
            let mut items = self.inner.value.borrow_mut();
            let before = items.len();
            items.retain(keep);
            before - items.len()
        };
        if removed > 0 {
            self.inner.subscribers.notify();
        }
        removed
    }

    /// Removes every item
    pub fn clear(&self) {
        self.inner.value.borrow_mut().clear();
        self.inner.subscribers.notify();
    }
}

impl<T> Reactive for ObservableVec<T> {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        self.inner.subscribers.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.remove(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableVec")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}
