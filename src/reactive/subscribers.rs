//! Subscriber bookkeeping shared by all reactive containers

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe
pub type SubscriptionId = u64;

/// Change callback
pub type Callback = Rc<dyn Fn()>;

/// Anything that can announce changes
pub trait Reactive {
    /// Registers a callback run after every change
    fn subscribe(&self, callback: Callback) -> SubscriptionId;

    /// Removes a callback; returns false if it was not registered
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: Cell<SubscriptionId>,
    list: RefCell<Vec<(SubscriptionId, Callback)>>,
}

impl Subscribers {
    pub(crate) fn add(&self, callback: Callback) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.list.borrow_mut().push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut list = self.list.borrow_mut();
        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        list.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.list.borrow().len()
    }

    /// Runs every callback in registration order.
    ///
    /// The list is copied first so callbacks may subscribe or unsubscribe.
    pub(crate) fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .list
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();

        for callback in callbacks {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_in_registration_order() {
        let subscribers = Subscribers::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        for n in 0..3 {
            let log = Rc::clone(&log);
            subscribers.add(Rc::new(move || log.borrow_mut().push(n)));
        }

        subscribers.notify();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove() {
        let subscribers = Subscribers::default();
        let id = subscribers.add(Rc::new(|| {}));
        assert_eq!(subscribers.len(), 1);
        assert!(subscribers.remove(id));
        assert!(!subscribers.remove(id));
        assert_eq!(subscribers.len(), 0);
    }
}
