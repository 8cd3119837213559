//! Single-action dispatch.
//!
//! # Outcome taxonomy
//!
//! ```text
//! do_action(key, target, ctx)
//!   key unknown            → Err(DispatchError::NotRegistered)   caller bug
//!   predicate says no      → Ok(DispatchOutcome::Unavailable)    quiet no-op, handler not called
//!   handler ran            → Ok(DispatchOutcome::Executed { success, message })
//! ```
//!
//! The result message travels in the return value. Nothing is stashed on the
//! registry or the dispatcher, so one dispatch can never leak its message into
//! the next.

use serde::Serialize;
use serde_json::json;

use crate::availability::is_available;
use crate::{ActionContext, ActionRegistry, DispatchError, Event, EventBus, MessageCode, TargetId};

/// What happened to a dispatch that reached a registered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The action does not apply to this target right now.
    Unavailable,
    /// The handler ran exactly once.
    Executed {
        success: bool,
        /// The configured success or failure code, if one matched.
        message: Option<MessageCode>,
    },
}

impl DispatchOutcome {
    pub fn executed(success: bool, message: Option<MessageCode>) -> Self {
        DispatchOutcome::Executed { success, message }
    }

    /// Returns true if the handler ran (whatever it returned).
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed { .. })
    }

    /// Returns true only if the handler ran and reported success.
    pub fn succeeded(&self) -> bool {
        matches!(self, DispatchOutcome::Executed { success: true, .. })
    }

    /// The result message to relay, if any.
    pub fn message(&self) -> Option<MessageCode> {
        match self {
            DispatchOutcome::Executed { message, .. } => *message,
            DispatchOutcome::Unavailable => None,
        }
    }
}

/// The result of one dispatch.
pub type DispatchResult = Result<DispatchOutcome, DispatchError>;

/// Runs registered actions against targets.
///
/// Borrows the registry read-only; create one per request or hold one for as
/// long as the registry lives.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a ActionRegistry,
    events: Option<&'a EventBus>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a ActionRegistry) -> Self {
        Self {
            registry,
            events: None,
        }
    }

    /// Publishes an event to `events` after every executed dispatch.
    ///
    /// The event is named `{kind}_admin_action_{key}` and carries
    /// `{"success": bool, "message": code | null}`.
    pub fn with_events(mut self, events: &'a EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs `key` against `target`.
    pub fn do_action(&self, key: &str, target: TargetId, ctx: &ActionContext) -> DispatchResult {
        let Some(record) = self.registry.get_action(key) else {
            tracing::debug!(action = key, target, "action not registered");
            return Err(DispatchError::NotRegistered(key.to_string()));
        };

        if !is_available(record, target, ctx) {
            tracing::debug!(action = key, target, "action unavailable for target");
            return Ok(DispatchOutcome::Unavailable);
        }

        let success = record.invoke(target, ctx);
        let message = record.message_for(success);

        tracing::debug!(action = key, target, success, ?message, "action executed");

        if let Some(events) = self.events {
            events.publish(&Event::new(
                action_event_name(self.registry.kind(), key),
                target,
                json!({ "success": success, "message": message }),
            ));
        }

        Ok(DispatchOutcome::Executed { success, message })
    }
}

/// Event name published for an executed action.
pub(crate) fn action_event_name(kind: &str, key: &str) -> String {
    format!("{kind}_admin_action_{key}")
}
