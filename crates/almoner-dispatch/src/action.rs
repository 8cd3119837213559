//! Action descriptors.
//!
//! An [`ActionSpec`] is the caller-facing builder: every field is optional so
//! that the registry, not the type system, decides whether a registration is
//! complete (a missing label or callback is a rejected registration, not a
//! compile error). Once accepted, the spec becomes an immutable
//! [`ActionRecord`].

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::handler::{ActionHandler, ActivePredicate, FnHandler};
use crate::ActionContext;

/// Identifier of the record an action runs against (donation, campaign, donor, ...).
pub type TargetId = u64;

/// Group used when a spec does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Opaque result-message identifier.
///
/// Dispatch never produces user-facing text. It hands back a code that the
/// presentation layer resolves against its own message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCode(pub u32);

impl MessageCode {
    /// Returns the raw numeric code.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MessageCode {
    fn from(code: u32) -> Self {
        MessageCode(code)
    }
}

/// Builder for an action registration.
///
/// # Example
///
/// ```rust
/// use almoner_dispatch::{ActionSpec, MessageCode};
///
/// let spec = ActionSpec::new()
///     .label("Resend receipt")
///     .button_text("Resend Email")
///     .callback(|_id, _ctx| true)
///     .success_message(MessageCode(11))
///     .failure_message(MessageCode(12))
///     .group("Resend Donation Emails");
/// ```
#[derive(Clone, Default)]
pub struct ActionSpec {
    pub(crate) label: Option<String>,
    pub(crate) callback: Option<Rc<dyn ActionHandler>>,
    pub(crate) button_text: Option<String>,
    pub(crate) active_callback: Option<ActivePredicate>,
    pub(crate) success_message: Option<MessageCode>,
    pub(crate) failure_message: Option<MessageCode>,
    pub(crate) group: Option<String>,
}

impl ActionSpec {
    /// Creates an empty spec. A label and a callback must be set before it can
    /// be registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the human-readable name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the handler from a closure.
    pub fn callback<F>(self, f: F) -> Self
    where
        F: Fn(TargetId, &ActionContext) -> bool + 'static,
    {
        self.handler(FnHandler::new(f))
    }

    /// Sets the handler from any [`ActionHandler`] implementation.
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: ActionHandler + 'static,
    {
        self.callback = Some(Rc::new(handler));
        self
    }

    /// Overrides the text shown on the button that submits this action.
    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = Some(text.into());
        self
    }

    /// Sets the availability predicate. Without one the action always applies.
    pub fn active_when<F>(mut self, f: F) -> Self
    where
        F: Fn(TargetId, &ActionContext) -> bool + 'static,
    {
        self.active_callback = Some(Rc::new(f));
        self
    }

    /// Code reported when the handler returns `true`.
    pub fn success_message(mut self, code: MessageCode) -> Self {
        self.success_message = Some(code);
        self
    }

    /// Code reported when the handler returns `false`.
    pub fn failure_message(mut self, code: MessageCode) -> Self {
        self.failure_message = Some(code);
        self
    }

    /// Files the action under `group` instead of [`DEFAULT_GROUP`].
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("label", &self.label)
            .field("has_callback", &self.callback.is_some())
            .field("button_text", &self.button_text)
            .field("has_active_callback", &self.active_callback.is_some())
            .field("success_message", &self.success_message)
            .field("failure_message", &self.failure_message)
            .field("group", &self.group)
            .finish()
    }
}

/// A registered action. Immutable once created.
///
/// Cloning is cheap: the handler and predicate are shared.
#[derive(Clone)]
pub struct ActionRecord {
    key: String,
    label: String,
    callback: Rc<dyn ActionHandler>,
    button_text: Option<String>,
    active_callback: Option<ActivePredicate>,
    success_message: Option<MessageCode>,
    failure_message: Option<MessageCode>,
    group: String,
}

impl ActionRecord {
    pub(crate) fn from_parts(
        key: String,
        label: String,
        callback: Rc<dyn ActionHandler>,
        spec: ActionSpec,
    ) -> Self {
        Self {
            key,
            label,
            callback,
            button_text: spec.button_text,
            active_callback: spec.active_callback,
            success_message: spec.success_message,
            failure_message: spec.failure_message,
            group: spec.group.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn button_text(&self) -> Option<&str> {
        self.button_text.as_deref()
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn success_message(&self) -> Option<MessageCode> {
        self.success_message
    }

    pub fn failure_message(&self) -> Option<MessageCode> {
        self.failure_message
    }

    /// Returns the availability predicate, if any.
    pub fn active_callback(&self) -> Option<&ActivePredicate> {
        self.active_callback.as_ref()
    }

    /// Runs the handler. Availability is the caller's concern.
    pub(crate) fn invoke(&self, target: TargetId, ctx: &ActionContext) -> bool {
        self.callback.handle(target, ctx)
    }

    /// Picks the message code matching a handler result.
    pub fn message_for(&self, success: bool) -> Option<MessageCode> {
        if success {
            self.success_message
        } else {
            self.failure_message
        }
    }

    /// Serializable view for listings.
    pub fn summary(&self) -> ActionSummary {
        ActionSummary {
            key: self.key.clone(),
            label: self.label.clone(),
            button_text: self.button_text.clone(),
            group: self.group.clone(),
        }
    }
}

impl fmt::Debug for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRecord")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("button_text", &self.button_text)
            .field("has_active_callback", &self.active_callback.is_some())
            .field("success_message", &self.success_message)
            .field("failure_message", &self.failure_message)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// Display-ready description of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    pub group: String,
}
