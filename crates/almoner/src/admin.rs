//! The donation admin service.
//!
//! [`DonationAdmin`] owns everything the donation screens need: the action
//! registry, the status vocabulary, the shared store and the event bus. Build
//! one at startup, register any extra actions, then use it read-only.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use almoner::{shared, Donation, DonationAdmin, EmailKind, MemoryStore, Settings};
//! use almoner_dispatch::ActionContext;
//!
//! let store = shared(MemoryStore::from_donations([Donation::new(7, "paid")]));
//! let mailer = Rc::new(|_: EmailKind, _: &Donation| true);
//! let admin = DonationAdmin::new(store, mailer, &Settings::default());
//!
//! let report = admin.run_action("resend_donation_receipt", 7, &ActionContext::new())?;
//! assert_eq!(report.notice.as_deref(), Some("Donation updated and email sent."));
//!
//! let bulk = admin.apply_bulk_status("set-refunded", &[7]);
//! assert_eq!(bulk.notice.as_deref(), Some("Donation status changed."));
//! # Ok::<(), almoner_dispatch::DispatchError>(())
//! ```

use std::rc::Rc;

use almoner_dispatch::{
    ActionContext, ActionRegistry, ActionSpec, ActionSummary, DispatchError, DispatchOutcome,
    Dispatcher, EventBus, TargetId,
};
use serde::Serialize;

use crate::bulk::{BulkAction, BulkOutcome, BulkStatusProcessor};
use crate::emails::{register_resend_actions, Mailer, RESEND_PREFIX};
use crate::messages::{bulk_status_notice, donation_message};
use crate::{DonationStore, Settings, SharedStore, StatusVocabulary, StoreError};

/// Registry kind for donation actions.
pub const DONATION_KIND: &str = "donation";

/// Prefix of the tokens older screens send for email resends.
pub const LEGACY_EMAIL_PREFIX: &str = "send_email_";

/// What a single action did, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub action: String,
    pub target: TargetId,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    /// Resolved text of the result message, if there is one.
    pub notice: Option<String>,
}

/// What a bulk request did, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    #[serde(flatten)]
    pub outcome: BulkOutcome,
    pub notice: Option<String>,
    /// Query parameter that carries the count back to the list screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// An available group with only its available members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub name: String,
    pub actions: Vec<ActionSummary>,
}

/// One tab of the donation list's status filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub key: String,
    pub label: String,
    pub count: usize,
}

/// Owning service for donation admin actions.
pub struct DonationAdmin<S> {
    registry: ActionRegistry,
    vocabulary: StatusVocabulary,
    store: SharedStore<S>,
    events: EventBus,
}

impl<S: DonationStore + 'static> DonationAdmin<S> {
    /// Builds the service and registers the resend-email actions.
    pub fn new<M: Mailer + 'static>(
        store: SharedStore<S>,
        mailer: Rc<M>,
        settings: &Settings,
    ) -> Self {
        let mut registry = ActionRegistry::new(DONATION_KIND);
        let count =
            register_resend_actions(&mut registry, &store, &mailer, &settings.email_settings());
        tracing::debug!(count, "resend actions registered");

        Self {
            registry,
            vocabulary: settings.vocabulary(),
            store,
            events: EventBus::new(),
        }
    }

    /// Replaces the event bus used for dispatch and bulk notifications.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Registers an additional action. See [`ActionRegistry::register`].
    pub fn register(&mut self, key: impl Into<String>, spec: ActionSpec) -> bool {
        self.registry.register(key, spec)
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn vocabulary(&self) -> &StatusVocabulary {
        &self.vocabulary
    }

    pub fn store(&self) -> &SharedStore<S> {
        &self.store
    }

    /// Actions that apply to donation `id`, in registration order.
    pub fn available_actions(&self, id: TargetId, ctx: &ActionContext) -> Vec<ActionSummary> {
        self.registry
            .get_available_actions(id, ctx)
            .values()
            .map(|record| record.summary())
            .collect()
    }

    /// Available groups, each listing only the members that currently apply.
    pub fn available_groups(&self, id: TargetId, ctx: &ActionContext) -> Vec<GroupView> {
        let available = self.registry.get_available_actions(id, ctx);
        self.registry
            .get_available_groups(id, ctx)
            .into_iter()
            .map(|(name, keys)| GroupView {
                name: name.to_string(),
                actions: keys
                    .iter()
                    .filter_map(|key| available.get(key.as_str()))
                    .map(|record| record.summary())
                    .collect(),
            })
            .filter(|group| !group.actions.is_empty())
            .collect()
    }

    /// Dispatches `key` against donation `id` and resolves the message text.
    pub fn run_action(
        &self,
        key: &str,
        id: TargetId,
        ctx: &ActionContext,
    ) -> Result<ActionReport, DispatchError> {
        let outcome = Dispatcher::new(&self.registry)
            .with_events(&self.events)
            .do_action(key, id, ctx)?;

        Ok(ActionReport {
            action: key.to_string(),
            target: id,
            outcome,
            notice: outcome
                .message()
                .and_then(donation_message)
                .map(str::to_string),
        })
    }

    /// Runs a token from the donation edit screen.
    ///
    /// `send_email_{id}` is the older spelling of `resend_{id}`; anything else
    /// is taken as an action key.
    pub fn process_action_token(
        &self,
        token: &str,
        id: TargetId,
        ctx: &ActionContext,
    ) -> Result<ActionReport, DispatchError> {
        match token.strip_prefix(LEGACY_EMAIL_PREFIX) {
            Some(email) => self.run_action(&format!("{RESEND_PREFIX}{email}"), id, ctx),
            None => self.run_action(token, id, ctx),
        }
    }

    fn bulk_processor(&self) -> BulkStatusProcessor<'_> {
        BulkStatusProcessor::new(&self.vocabulary).with_events(&self.events)
    }

    pub fn bulk_actions(&self) -> Vec<BulkAction> {
        self.bulk_processor().bulk_actions()
    }

    /// Applies a `set-{status}` token to `ids`.
    pub fn apply_bulk_status(&self, token: &str, ids: &[TargetId]) -> BulkReport {
        let mut store = Rc::clone(&self.store);
        let outcome = self.bulk_processor().apply_bulk_status(&mut store, token, ids);
        let notice = outcome.count().map(bulk_status_notice);
        let query = outcome.report_query();
        BulkReport {
            outcome,
            notice,
            query,
        }
    }

    /// Per-status donation counts in vocabulary order, then an `all` total.
    ///
    /// Donations whose status is outside the vocabulary are left out of every
    /// view, including `all`.
    pub fn status_views(&self) -> Result<Vec<StatusView>, StoreError> {
        let counts = self.store.borrow().count_by_status()?;

        let mut views: Vec<StatusView> = self
            .vocabulary
            .iter()
            .map(|(key, label)| StatusView {
                key: key.to_string(),
                label: label.to_string(),
                count: counts.get(key).copied().unwrap_or(0),
            })
            .collect();

        let total = views.iter().map(|view| view.count).sum();
        views.push(StatusView {
            key: "all".to_string(),
            label: "All".to_string(),
            count: total,
        });
        Ok(views)
    }
}
