//! Bulk status changes from the donation list.
//!
//! A bulk token has the form `set-{status}`. Tokens without the prefix are not
//! status actions and belong to the caller's default list handling. Tokens with
//! the prefix but an unknown status abort without touching anything.
//!
//! The reported count is the number of ids *attempted*: an item whose update
//! fails or is a no-op still counts toward the total.

use almoner_dispatch::{Event, EventBus, TargetId};
use serde::Serialize;
use serde_json::json;

use crate::{DonationStore, StatusVocabulary};

/// Prefix that marks a bulk token as a status change.
pub const STATUS_ACTION_PREFIX: &str = "set-";

/// Event published once per processed donation.
pub const BULK_EVENT: &str = "donations_table_do_bulk_action";

/// Query key under which the count is reported back to the list screen.
pub const REPORT_KEY: &str = "bulk_donation_status_update";

/// Result of a bulk status request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkOutcome {
    /// Token is not a status change.
    NotAStatusAction,
    /// Status key outside the vocabulary. Nothing was processed.
    InvalidStatus { status: String },
    /// Every id was attempted.
    Applied { status: String, count: usize },
}

impl BulkOutcome {
    /// Count to report, if the batch ran.
    pub fn count(&self) -> Option<usize> {
        match self {
            BulkOutcome::Applied { count, .. } => Some(*count),
            _ => None,
        }
    }

    /// `bulk_donation_status_update={count}` for the list screen, if the batch ran.
    pub fn report_query(&self) -> Option<String> {
        self.count().map(|count| format!("{REPORT_KEY}={count}"))
    }
}

/// One entry of the bulk actions dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAction {
    pub token: String,
    pub label: String,
}

/// Extracts the status key from a `set-{status}` token.
pub fn parse_status_token(token: &str) -> Option<&str> {
    token.strip_prefix(STATUS_ACTION_PREFIX)
}

/// Validates bulk tokens against a vocabulary and fans the change out.
#[derive(Debug, Clone, Copy)]
pub struct BulkStatusProcessor<'a> {
    vocabulary: &'a StatusVocabulary,
    events: Option<&'a EventBus>,
}

impl<'a> BulkStatusProcessor<'a> {
    pub fn new(vocabulary: &'a StatusVocabulary) -> Self {
        Self {
            vocabulary,
            events: None,
        }
    }

    /// Publishes a [`BULK_EVENT`] per processed id.
    pub fn with_events(mut self, events: &'a EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// One `set-{key}` action per vocabulary entry, in vocabulary order.
    pub fn bulk_actions(&self) -> Vec<BulkAction> {
        self.vocabulary
            .iter()
            .map(|(key, label)| BulkAction {
                token: format!("{STATUS_ACTION_PREFIX}{key}"),
                label: format!("Set to {label}"),
            })
            .collect()
    }

    /// Applies the status named by `token` to every id in `ids`.
    ///
    /// Ids are processed in order and never short-circuit: a store error on
    /// one donation is logged and the batch moves on.
    pub fn apply_bulk_status<S>(&self, store: &mut S, token: &str, ids: &[TargetId]) -> BulkOutcome
    where
        S: DonationStore + ?Sized,
    {
        let Some(status) = parse_status_token(token) else {
            return BulkOutcome::NotAStatusAction;
        };

        if !self.vocabulary.contains(status) {
            tracing::debug!(token, status, "bulk status rejected");
            return BulkOutcome::InvalidStatus {
                status: status.to_string(),
            };
        }

        for &id in ids {
            if let Err(err) = store.update_status(id, status) {
                tracing::warn!(donation = id, status, error = %err, "bulk status update failed");
            }
            if let Some(events) = self.events {
                events.publish(&Event::new(BULK_EVENT, id, json!({ "status": status })));
            }
        }

        tracing::info!(status, count = ids.len(), "bulk status applied");
        BulkOutcome::Applied {
            status: status.to_string(),
            count: ids.len(),
        }
    }
}
