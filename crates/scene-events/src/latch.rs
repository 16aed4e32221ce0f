//! Polling adapter for bus listeners.
//!
//! Director steps own their state and are not themselves shared with the bus.
//! Instead, a step that cares about events subscribes an `EventLatch` and
//! drains it from its per-tick update.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::bus::EventListener;

/// Listener that records event names in arrival order.
#[derive(Debug, Default)]
pub struct EventLatch {
    events: VecDeque<String>,
}

impl EventLatch {
    /// Creates a latch wrapped for subscription on the bus.
    pub fn shared() -> Rc<RefCell<EventLatch>> {
        Rc::new(RefCell::new(EventLatch::default()))
    }

    /// Removes and returns the oldest recorded event, if any.
    pub fn pop(&mut self) -> Option<String> {
        self.events.pop_front()
    }

    /// True if no events have arrived since the last drain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<C> EventListener<C> for EventLatch {
    fn on_event(&mut self, name: &str, _ctx: &mut C) {
        self.events.push_back(name.to_string());
    }
}
