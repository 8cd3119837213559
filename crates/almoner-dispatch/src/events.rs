//! Fire-and-forget notifications.
//!
//! Dispatch and bulk processing announce what they did so that observers
//! (audit logs, cache invalidation, follow-up jobs) can react without the core
//! knowing about them.
//!
//! # Publication Points
//!
//! ```text
//! Dispatcher::do_action     → {kind}_admin_action_{key}   once per executed dispatch
//! bulk status processing    → one event per target id
//! ```
//!
//! Subscribers run synchronously, in subscription order, and return nothing:
//! the publisher never waits on or inspects a subscriber result.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::TargetId;

/// A published notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Event name, e.g. `donation_admin_action_resend_donation_receipt`
    pub name: String,
    /// The record the event is about
    pub target: TargetId,
    /// Event-specific data
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(name: impl Into<String>, target: TargetId, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            target,
            payload,
        }
    }
}

/// Type alias for subscriber functions.
pub type SubscriberFn = Rc<dyn Fn(&Event)>;

#[derive(Clone)]
struct Subscription {
    /// `None` receives every event
    name: Option<String>,
    f: SubscriberFn,
}

/// Synchronous in-process event bus.
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Adds a subscriber for every event.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use almoner_dispatch::{Event, EventBus};
    ///
    /// let count = Rc::new(Cell::new(0));
    /// let count_clone = count.clone();
    /// let bus = EventBus::new().subscribe(move |_event| count_clone.set(count_clone.get() + 1));
    ///
    /// bus.publish(&Event::new("anything", 1, serde_json::Value::Null));
    /// assert_eq!(count.get(), 1);
    /// ```
    pub fn subscribe<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        self.subscriptions.push(Subscription {
            name: None,
            f: Rc::new(f),
        });
        self
    }

    /// Adds a subscriber for events named exactly `name`.
    pub fn on<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        self.subscriptions.push(Subscription {
            name: Some(name.into()),
            f: Rc::new(f),
        });
        self
    }

    /// Delivers `event` to every matching subscriber.
    pub fn publish(&self, event: &Event) {
        for subscription in &self.subscriptions {
            let matches = subscription
                .name
                .as_deref()
                .map_or(true, |name| name == event.name);
            if matches {
                (subscription.f)(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriptions.len())
            .finish()
    }
}
