use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn(u16, u16)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Callback)>,
}

/// Screen-wide mouse-down listeners.
///
/// Widgets subscribe while they are alive; the returned handle removes the
/// listener when dropped.
#[derive(Clone, Default)]
pub struct ClickListeners {
    registry: Rc<RefCell<Registry>>,
}

impl ClickListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> ClickSubscription
    where
        F: Fn(u16, u16) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(callback)));
        ClickSubscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Deliver a click at (column, row) to every live listener.
    pub fn dispatch(&self, column: u16, row: u16) {
        // listeners may subscribe or drop handles while running
        let callbacks: Vec<Callback> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(column, row);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct ClickSubscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let listeners = ClickListeners::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = listeners.subscribe(move |x, y| {
            assert_eq!((x, y), (3, 4));
            h.set(h.get() + 1);
        });
        listeners.dispatch(3, 4);
        listeners.dispatch(3, 4);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let listeners = ClickListeners::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = listeners.subscribe(move |_, _| h.set(h.get() + 1));
        let _other = listeners.subscribe(|_, _| {});
        assert_eq!(listeners.len(), 2);
        drop(sub);
        assert_eq!(listeners.len(), 1);
        listeners.dispatch(0, 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let listeners = ClickListeners::new();
        let sub = listeners.subscribe(|_, _| {});
        drop(listeners);
        drop(sub);
    }
}
