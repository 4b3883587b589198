//! Synchronous subscriber registry shared by the client stores.
//!
//! Listeners are cloned out before they run, so a listener may read the
//! store, subscribe, or unsubscribe without a `RefCell` double borrow.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by `subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

pub struct Listeners<T> {
    entries: RefCell<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self { entries: RefCell::new(Vec::new()), next_id: Cell::new(0) }
    }
}

impl<T> Listeners<T> {
    pub fn subscribe<F: Fn(&T) + 'static>(&self, listener: F) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.entries.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self.entries.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in snapshot {
            listener(value);
        }
    }
}
