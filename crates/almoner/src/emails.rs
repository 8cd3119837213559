//! Notification emails and the "resend" actions built on them.
//!
//! Each resendable [`EmailKind`] becomes one donation action keyed
//! `resend_{email_id}`. The action applies when the email is enabled, the
//! donation exists, and the donation is in a state the email makes sense for.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use almoner_dispatch::{ActionContext, ActionHandler, ActionRegistry, ActionSpec, TargetId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::{EMAIL_FAILED, EMAIL_SENT};
use crate::{Donation, DonationStore, SharedStore};

/// Group the resend actions are listed under.
pub const RESEND_GROUP: &str = "Resend Donation Emails";

/// Button caption shared by all resend actions.
pub const RESEND_BUTTON: &str = "Resend Email";

/// Prefix of resend action keys.
pub const RESEND_PREFIX: &str = "resend_";

/// The closed set of notification emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    DonationReceipt,
    NewDonation,
    CampaignEnd,
    PasswordReset,
    OfflineDonationReceipt,
    OfflineDonationNotification,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown email \"{0}\"")]
pub struct UnknownEmail(pub String);

impl EmailKind {
    pub const ALL: [EmailKind; 6] = [
        EmailKind::DonationReceipt,
        EmailKind::NewDonation,
        EmailKind::CampaignEnd,
        EmailKind::PasswordReset,
        EmailKind::OfflineDonationReceipt,
        EmailKind::OfflineDonationNotification,
    ];

    /// Stable identifier used in settings and action keys.
    pub fn id(self) -> &'static str {
        match self {
            EmailKind::DonationReceipt => "donation_receipt",
            EmailKind::NewDonation => "new_donation",
            EmailKind::CampaignEnd => "campaign_end",
            EmailKind::PasswordReset => "password_reset",
            EmailKind::OfflineDonationReceipt => "offline_donation_receipt",
            EmailKind::OfflineDonationNotification => "offline_donation_notification",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EmailKind::DonationReceipt => "Donation Receipt",
            EmailKind::NewDonation => "New Donation Notification",
            EmailKind::CampaignEnd => "Campaign Ended",
            EmailKind::PasswordReset => "Password Reset",
            EmailKind::OfflineDonationReceipt => "Offline Donation Receipt",
            EmailKind::OfflineDonationNotification => "Offline Donation Notification",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Whether a resend action exists for this email.
    pub fn is_resendable(self) -> bool {
        !matches!(self, EmailKind::CampaignEnd | EmailKind::PasswordReset)
    }

    /// Action key of the resend action for this email.
    pub fn resend_key(self) -> String {
        format!("{RESEND_PREFIX}{}", self.id())
    }

    /// Whether `donation` is in a state this email can be resent for.
    pub fn can_be_resent(self, donation: &Donation) -> bool {
        match self {
            EmailKind::DonationReceipt | EmailKind::NewDonation => donation.status == "paid",
            EmailKind::OfflineDonationReceipt | EmailKind::OfflineDonationNotification => {
                donation.is_offline() && donation.status == "pending"
            }
            EmailKind::CampaignEnd | EmailKind::PasswordReset => false,
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EmailKind {
    type Err = UnknownEmail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownEmail(s.to_string()))
    }
}

/// Outbound email collaborator.
pub trait Mailer {
    /// Sends `kind` for `donation`, returning whether it went out.
    fn send(&self, kind: EmailKind, donation: &Donation) -> bool;
}

impl<F> Mailer for F
where
    F: Fn(EmailKind, &Donation) -> bool,
{
    fn send(&self, kind: EmailKind, donation: &Donation) -> bool {
        self(kind, donation)
    }
}

/// Which emails are switched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    enabled: Vec<EmailKind>,
}

impl EmailSettings {
    pub fn new(enabled: impl IntoIterator<Item = EmailKind>) -> Self {
        Self {
            enabled: enabled.into_iter().collect(),
        }
    }

    /// Password reset is always on.
    pub fn is_enabled(&self, kind: EmailKind) -> bool {
        kind == EmailKind::PasswordReset || self.enabled.contains(&kind)
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self::new([EmailKind::DonationReceipt, EmailKind::NewDonation])
    }
}

/// Handler that resends one email kind.
pub struct ResendEmail<S, M> {
    kind: EmailKind,
    store: SharedStore<S>,
    mailer: Rc<M>,
}

impl<S, M> ResendEmail<S, M> {
    pub fn new(kind: EmailKind, store: SharedStore<S>, mailer: Rc<M>) -> Self {
        Self {
            kind,
            store,
            mailer,
        }
    }
}

impl<S: DonationStore, M: Mailer> ActionHandler for ResendEmail<S, M> {
    fn handle(&self, target: TargetId, _ctx: &ActionContext) -> bool {
        let found = self.store.borrow().get(target);
        let donation = match found {
            Ok(Some(donation)) => donation,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(donation = target, email = %self.kind, error = %err, "resend lookup failed");
                return false;
            }
        };

        if !self.mailer.send(self.kind, &donation) {
            tracing::debug!(donation = target, email = %self.kind, "mailer reported failure");
            return false;
        }

        let note = format!("{} email notification manually sent.", self.kind.name());
        if let Err(err) = self.store.borrow_mut().append_log(target, &note) {
            tracing::warn!(donation = target, error = %err, "could not record resend");
        }
        true
    }
}

/// Registers one resend action per resendable email.
///
/// Returns the number of actions accepted by the registry.
pub fn register_resend_actions<S, M>(
    registry: &mut ActionRegistry,
    store: &SharedStore<S>,
    mailer: &Rc<M>,
    settings: &EmailSettings,
) -> usize
where
    S: DonationStore + 'static,
    M: Mailer + 'static,
{
    let mut registered = 0;
    for kind in EmailKind::ALL.into_iter().filter(|k| k.is_resendable()) {
        let enabled = settings.is_enabled(kind);
        let lookup = Rc::clone(store);

        let spec = ActionSpec::new()
            .label(kind.name())
            .button_text(RESEND_BUTTON)
            .group(RESEND_GROUP)
            .handler(ResendEmail::new(kind, Rc::clone(store), Rc::clone(mailer)))
            .active_when(move |id, _| {
                enabled
                    && matches!(lookup.borrow().get(id), Ok(Some(d)) if kind.can_be_resent(&d))
            })
            .success_message(EMAIL_SENT)
            .failure_message(EMAIL_FAILED);

        if registry.register(kind.resend_key(), spec) {
            registered += 1;
        }
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shared, MemoryStore};
    use almoner_dispatch::DispatchOutcome;
    use std::cell::Cell;

    fn donations() -> MemoryStore {
        MemoryStore::from_donations([
            Donation::new(1, "paid"),
            Donation::new(2, "pending"),
            Donation::new(3, "pending").with_gateway("offline"),
        ])
    }

    #[test]
    fn test_ids_round_trip() {
        for kind in EmailKind::ALL {
            assert_eq!(kind.id().parse::<EmailKind>(), Ok(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.id());
        }
        assert_eq!("nope".parse::<EmailKind>(), Err(UnknownEmail("nope".into())));
    }

    #[test]
    fn test_resend_rules() {
        let paid = Donation::new(1, "paid");
        let offline = Donation::new(2, "pending").with_gateway("offline");
        let offline_paid = Donation::new(3, "paid").with_gateway("offline");

        assert!(EmailKind::DonationReceipt.can_be_resent(&paid));
        assert!(EmailKind::NewDonation.can_be_resent(&offline_paid));
        assert!(!EmailKind::DonationReceipt.can_be_resent(&offline));
        assert!(EmailKind::OfflineDonationReceipt.can_be_resent(&offline));
        assert!(!EmailKind::OfflineDonationNotification.can_be_resent(&offline_paid));
        assert!(!EmailKind::PasswordReset.can_be_resent(&paid));
    }

    #[test]
    fn test_password_reset_always_enabled() {
        let settings = EmailSettings::new([]);
        assert!(settings.is_enabled(EmailKind::PasswordReset));
        assert!(!settings.is_enabled(EmailKind::DonationReceipt));
        assert!(EmailSettings::default().is_enabled(EmailKind::NewDonation));
    }

    #[test]
    fn test_registers_resendable_kinds_only() {
        let mut registry = ActionRegistry::new("donation");
        let store = shared(donations());
        let mailer = Rc::new(|_: EmailKind, _: &Donation| true);

        let count =
            register_resend_actions(&mut registry, &store, &mailer, &EmailSettings::default());
        assert_eq!(count, 4);
        assert_eq!(
            registry.get_groups()[RESEND_GROUP],
            vec![
                "resend_donation_receipt",
                "resend_new_donation",
                "resend_offline_donation_receipt",
                "resend_offline_donation_notification",
            ]
        );

        let record = registry.get_action("resend_donation_receipt").unwrap();
        assert_eq!(record.label(), "Donation Receipt");
        assert_eq!(record.button_text(), Some(RESEND_BUTTON));
        assert_eq!(record.success_message(), Some(EMAIL_SENT));
        assert_eq!(record.failure_message(), Some(EMAIL_FAILED));
    }

    #[test]
    fn test_availability_checks_settings_and_state() {
        let mut registry = ActionRegistry::new("donation");
        let store = shared(donations());
        let mailer = Rc::new(|_: EmailKind, _: &Donation| true);
        let settings = EmailSettings::new([
            EmailKind::DonationReceipt,
            EmailKind::OfflineDonationReceipt,
        ]);
        register_resend_actions(&mut registry, &store, &mailer, &settings);

        let ctx = ActionContext::new();
        let keys = |id| -> Vec<String> {
            registry
                .get_available_actions(id, &ctx)
                .into_keys()
                .map(String::from)
                .collect()
        };

        assert_eq!(keys(1), vec!["resend_donation_receipt"]);
        assert!(keys(2).is_empty());
        assert_eq!(keys(3), vec!["resend_offline_donation_receipt"]);
        assert!(keys(404).is_empty());
    }

    #[test]
    fn test_resend_logs_on_success() {
        let mut registry = ActionRegistry::new("donation");
        let store = shared(donations());
        let sent = Rc::new(Cell::new(0));
        let sent_clone = sent.clone();
        let mailer = Rc::new(move |kind: EmailKind, d: &Donation| {
            assert_eq!((kind, d.id), (EmailKind::DonationReceipt, 1));
            sent_clone.set(sent_clone.get() + 1);
            true
        });
        register_resend_actions(&mut registry, &store, &mailer, &EmailSettings::default());

        let outcome = registry
            .do_action("resend_donation_receipt", 1, &ActionContext::new())
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::executed(true, Some(EMAIL_SENT)));
        assert_eq!(sent.get(), 1);
        assert_eq!(
            store.borrow().resolve(1).unwrap().log,
            vec!["Donation Receipt email notification manually sent."]
        );
    }

    #[test]
    fn test_resend_failure_reports_failed_message() {
        let mut registry = ActionRegistry::new("donation");
        let store = shared(donations());
        let mailer = Rc::new(|_: EmailKind, _: &Donation| false);
        register_resend_actions(&mut registry, &store, &mailer, &EmailSettings::default());

        let outcome = registry
            .do_action("resend_new_donation", 1, &ActionContext::new())
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::executed(false, Some(EMAIL_FAILED)));
        assert!(store.borrow().resolve(1).unwrap().log.is_empty());
    }
}
