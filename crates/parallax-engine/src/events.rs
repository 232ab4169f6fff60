//! Subscription registry.
//!
//! Each component that emits notifications owns one `Subscribers<E>`. Listeners
//! live exactly as long as the owning component, or until they unsubscribe.

use std::fmt;

/// Handle returned by `Subscribers::subscribe`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Subscription(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered list of listeners for events of type `E`.
pub struct Subscribers<E> {
    next_id: u64,
    listeners: Vec<(Subscription, Listener<E>)>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Registers `listener`; it is called in subscription order on every emit.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::<u32>::new();

        let l = log.clone();
        subs.subscribe(move |e| l.borrow_mut().push(("a", *e)));
        let l = log.clone();
        subs.subscribe(move |e| l.borrow_mut().push(("b", *e)));

        subs.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let hits = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::<()>::new();

        let h = hits.clone();
        let id = subs.subscribe(move |_| *h.borrow_mut() += 1);
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));

        subs.emit(&());
        assert_eq!(*hits.borrow(), 0);
        assert!(subs.is_empty());
    }
}
