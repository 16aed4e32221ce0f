//! Named-event publish/subscribe channel.
//!
//! A single global channel: every listener sees every event and dispatches on
//! the event name. Emission iterates over a snapshot of the listener list, so
//! handlers may freely subscribe or unsubscribe while an emission is in
//! progress without corrupting iteration.

use std::cell::RefCell;
use std::rc::Rc;

/// A listener on the event bus.
///
/// Handlers receive the event name together with mutable access to the shared
/// scene context `C`, so a handler can itself play audio, mutate the player,
/// or emit further events.
pub trait EventListener<C> {
    fn on_event(&mut self, name: &str, ctx: &mut C);
}

/// Shared handle to a registered listener.
pub type ListenerHandle<C> = Rc<RefCell<dyn EventListener<C>>>;

/// Identifies one subscription on the bus.
///
/// Subscribing the same listener object twice produces two distinct
/// subscriptions, and the listener is notified once per subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct BusInner<C> {
    listeners: Vec<(SubscriptionId, ListenerHandle<C>)>,
    next_id: u64,
}

/// Single-channel event bus with snapshot-on-emit semantics.
///
/// Cloning produces another handle to the same channel.
pub struct EventBus<C> {
    inner: Rc<RefCell<BusInner<C>>>,
}

impl<C> Clone for EventBus<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                listeners: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Registers a listener and returns its subscription id.
    pub fn subscribe(&self, listener: ListenerHandle<C>) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        id
    }

    /// Removes a subscription. Returns false if it was not present.
    ///
    /// Removing a subscription during an emission only affects later
    /// emissions; the emission in progress still delivers to its snapshot.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.listeners.iter().position(|(sub, _)| *sub == id) {
            Some(index) => {
                inner.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Notifies every listener registered at the start of this call.
    ///
    /// The listener list is snapshotted before any handler runs, in insertion
    /// order. Listeners added by a handler are not notified in this emission.
    /// A handler fault propagates to the emitter and aborts the remaining
    /// notifications.
    pub fn emit(&self, name: &str, ctx: &mut C) {
        let snapshot: Vec<ListenerHandle<C>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.borrow_mut().on_event(name, ctx);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}
