//! Donation admin actions.
//!
//! `almoner` puts the generic engine from [`almoner_dispatch`] to work on
//! donations:
//!
//! - [`StatusVocabulary`]: the closed, ordered set of donation statuses
//! - [`DonationStore`]: the persistence collaborator, with [`MemoryStore`] as a
//!   JSON-file backed implementation
//! - [`BulkStatusProcessor`]: `set-{status}` bulk actions from the donation list
//! - [`EmailKind`] and [`register_resend_actions`]: "resend this email" actions
//! - [`messages`]: the text behind result message codes
//! - [`Settings`]: YAML configuration
//! - [`DonationAdmin`]: the service that owns all of the above
//!
//! See [`admin`] for an end-to-end example.

pub mod admin;
pub mod bulk;
mod donation;
pub mod emails;
pub mod messages;
mod settings;
mod status;
mod store;

pub use admin::{ActionReport, BulkReport, DonationAdmin, GroupView, StatusView};
pub use bulk::{parse_status_token, BulkAction, BulkOutcome, BulkStatusProcessor};
pub use donation::{Donation, OFFLINE_GATEWAY};
pub use emails::{register_resend_actions, EmailKind, EmailSettings, Mailer, ResendEmail};
pub use settings::{Settings, SettingsError};
pub use status::StatusVocabulary;
pub use store::{shared, DonationStore, MemoryStore, SharedStore, StatusChange, StoreError};
