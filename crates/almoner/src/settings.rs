//! Admin settings loaded from YAML.
//!
//! ```yaml
//! enabled_emails:
//!   - donation_receipt
//!   - offline_donation_receipt
//! statuses:
//!   pending: Pending
//!   paid: Paid
//! ```
//!
//! Every field is optional. Missing `enabled_emails` keeps the stock pair
//! (receipt and new donation notification); missing `statuses` keeps the stock
//! donation vocabulary.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emails::UnknownEmail;
use crate::{EmailKind, EmailSettings, StatusVocabulary};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid settings: {0}")]
    UnknownEmail(#[from] UnknownEmail),
}

/// Resolved admin settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub enabled_emails: Vec<EmailKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<IndexMap<String, String>>,
}

/// On-disk shape. Email ids are checked after parsing so that a typo names the
/// offending id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    enabled_emails: Option<Vec<String>>,
    statuses: Option<IndexMap<String, String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_emails: vec![EmailKind::DonationReceipt, EmailKind::NewDonation],
            statuses: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        // An empty file is valid and means "all defaults".
        let raw: RawSettings = if yaml.trim().is_empty() {
            RawSettings::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        let mut settings = Settings::default();
        if let Some(ids) = raw.enabled_emails {
            settings.enabled_emails = ids
                .iter()
                .map(|id| id.parse::<EmailKind>())
                .collect::<Result<Vec<_>, UnknownEmail>>()?;
        }
        settings.statuses = raw.statuses;
        Ok(settings)
    }

    /// Status vocabulary, overridden or stock.
    pub fn vocabulary(&self) -> StatusVocabulary {
        match &self.statuses {
            Some(statuses) => StatusVocabulary::new(statuses.clone()),
            None => StatusVocabulary::donation_defaults(),
        }
    }

    pub fn email_settings(&self) -> EmailSettings {
        EmailSettings::new(self.enabled_emails.iter().copied())
    }
}
