//! The closed set of donation statuses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered status key → label map.
///
/// The order drives both the bulk action list and the status views. Anything
/// not in the map is an invalid status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusVocabulary {
    statuses: IndexMap<String, String>,
}

impl StatusVocabulary {
    pub fn new(statuses: IndexMap<String, String>) -> Self {
        Self { statuses }
    }

    /// The stock donation statuses.
    pub fn donation_defaults() -> Self {
        [
            ("pending", "Pending"),
            ("paid", "Paid"),
            ("failed", "Failed"),
            ("cancelled", "Cancelled"),
            ("refunded", "Refunded"),
            ("preapproved", "Pre Approved"),
        ]
        .into_iter()
        .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.statuses.contains_key(key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.statuses.get(key).map(String::as_str)
    }

    /// Iterates `(key, label)` pairs in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.statuses.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::donation_defaults()
    }
}

impl<K, V> FromIterator<(K, V)> for StatusVocabulary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            statuses: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
