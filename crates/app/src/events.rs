use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Notification that the container may have changed size. Listeners re-query
/// the container; the event carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize;

type Listener<E> = Box<dyn FnMut(&E)>;

struct Registry<E> {
    next_id: u64,
    /// A `None` slot is a listener that is currently running.
    entries: Vec<(u64, Option<Listener<E>>)>,
}

trait Unsubscribe {
    /// Detach the entry and hand back the listener it owned. The caller drops
    /// it after releasing the registry borrow, since the listener may itself
    /// own subscriptions to this registry.
    fn unsubscribe(&mut self, id: u64) -> Option<Box<dyn Any>>;
}

impl<E: 'static> Unsubscribe for Registry<E> {
    fn unsubscribe(&mut self, id: u64) -> Option<Box<dyn Any>> {
        let index = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        let (_, listener) = self.entries.remove(index);
        listener.map(|listener| Box::new(listener) as Box<dyn Any>)
    }
}

/// Single-threaded event source with handle-based subscriptions.
///
/// Clones share the same listener list. Listeners run in subscription order.
/// A listener may drop its own or any other subscription while running.
pub struct EventSource<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for EventSource<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("listeners", &self.registry.borrow().entries.len())
            .finish()
    }
}

impl<E: 'static> EventSource<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `listener`. It stays registered until the returned handle is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Some(Box::new(listener))));
            id
        };
        let registry: Weak<RefCell<dyn Unsubscribe>> = Rc::downgrade(&self.registry) as _;
        Subscription { id, registry }
    }

    /// Deliver `event` to every listener. Returns how many were invoked.
    pub fn emit(&self, event: &E) -> usize {
        let ids: Vec<u64> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(id, _)| *id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let listener = {
                let mut registry = self.registry.borrow_mut();
                registry
                    .entries
                    .iter_mut()
                    .find(|(entry_id, _)| *entry_id == id)
                    .and_then(|(_, slot)| slot.take())
            };
            // Unsubscribed meanwhile, or already running further up the stack.
            let Some(mut listener) = listener else {
                continue;
            };
            listener(event);
            delivered += 1;

            let mut registry = self.registry.borrow_mut();
            if let Some((_, slot)) = registry
                .entries
                .iter_mut()
                .find(|(entry_id, _)| *entry_id == id)
            {
                *slot = Some(listener);
                continue;
            }
            // Unsubscribed while running: release the borrow before the
            // listener and anything it owns go away.
            drop(registry);
            drop(listener);
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<dyn Unsubscribe>>,
}

impl Subscription {
    /// False once the event source itself is gone.
    pub fn is_active(&self) -> bool {
        self.registry.strong_count() > 0
    }

    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let detached = registry.borrow_mut().unsubscribe(self.id);
            drop(detached);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listeners_run_in_order() {
        let source = EventSource::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = source.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = source.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        assert_eq!(source.emit(&7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let source = EventSource::<Resize>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = source.subscribe(move |_| h.set(h.get() + 1));

        source.emit(&Resize);
        assert_eq!(source.listener_count(), 1);
        drop(sub);
        assert_eq!(source.listener_count(), 0);
        assert_eq!(source.emit(&Resize), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clones_share_listeners() {
        let source = EventSource::<Resize>::new();
        let other = source.clone();
        let _sub = other.subscribe(|_| {});
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn listener_may_drop_its_own_subscription() {
        let source = EventSource::<Resize>::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let sub = source.subscribe(move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        assert_eq!(source.emit(&Resize), 1);
        assert_eq!(source.listener_count(), 0);
        assert_eq!(source.emit(&Resize), 0);
    }

    #[test]
    fn nested_emit_skips_running_listener() {
        let source = EventSource::<u32>::new();
        let depth = Rc::new(Cell::new(0));
        let inner_source = source.clone();
        let d = Rc::clone(&depth);
        let _sub = source.subscribe(move |v| {
            d.set(d.get() + 1);
            if *v == 0 {
                assert_eq!(inner_source.emit(&1), 0);
            }
        });
        assert_eq!(source.emit(&0), 1);
        assert_eq!(depth.get(), 1);
    }

    #[test]
    fn dropping_listener_that_owns_another_subscription() {
        let source = EventSource::<Resize>::new();
        let inner = source.subscribe(|_| {});
        let outer = source.subscribe(move |_| {
            let _keep = &inner;
        });
        assert_eq!(source.listener_count(), 2);

        drop(outer);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn running_listener_may_drop_a_subscription_owning_others() {
        let source = EventSource::<Resize>::new();
        let inner = source.subscribe(|_| {});
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let own = Rc::clone(&slot);
        let sub = source.subscribe(move |_| {
            let _keep = &inner;
            own.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        assert_eq!(source.emit(&Resize), 2);
        assert_eq!(source.listener_count(), 0);
        assert_eq!(source.emit(&Resize), 0);
    }

    #[test]
    fn subscription_outlives_source() {
        let source = EventSource::<Resize>::new();
        let sub = source.subscribe(|_| {});
        assert!(sub.is_active());
        drop(source);
        assert!(!sub.is_active());
        drop(sub);
    }
}
