//! Persistence collaborator.
//!
//! The admin layer never touches storage directly. It goes through
//! [`DonationStore`], which owns status transitions and the donation log.
//! [`MemoryStore`] is the bundled implementation: an ordered in-memory table
//! that can be loaded from and saved to a JSON file.
//!
//! # Example
//!
//! ```rust
//! use almoner::{Donation, DonationStore, MemoryStore};
//!
//! let mut store = MemoryStore::from_donations([Donation::new(1, "pending")]);
//! let change = store.update_status(1, "paid").unwrap();
//!
//! assert!(change.is_some());
//! assert_eq!(store.resolve(1).unwrap().status, "paid");
//! assert_eq!(store.update_status(1, "paid").unwrap(), None);
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use almoner_dispatch::TargetId;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::Donation;

/// Errors raised by a [`DonationStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("donation {0} not found")]
    NotFound(TargetId),

    #[error("donation data could not be read or written: {0}")]
    Io(#[from] std::io::Error),

    #[error("donation data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A status transition that actually happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: TargetId,
    pub from: String,
    pub to: String,
}

impl StatusChange {
    /// Log line recorded on the donation for this change.
    pub fn log_message(&self) -> String {
        format!("Donation status updated from {} to {}.", self.from, self.to)
    }
}

/// Storage backend for donations.
///
/// Mutations take `&mut self`; callers that share a store between action
/// handlers wrap it in a [`SharedStore`].
pub trait DonationStore {
    /// Fetches a donation, `None` if absent.
    fn get(&self, id: TargetId) -> Result<Option<Donation>, StoreError>;

    /// Fetches a donation, turning absence into [`StoreError::NotFound`].
    fn resolve(&self, id: TargetId) -> Result<Donation, StoreError> {
        self.get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Moves a donation to `status`.
    ///
    /// Returns `Ok(None)` when the donation already has that status. A real
    /// change is recorded in the donation log.
    fn update_status(
        &mut self,
        id: TargetId,
        status: &str,
    ) -> Result<Option<StatusChange>, StoreError>;

    /// Appends a line to the donation log.
    fn append_log(&mut self, id: TargetId, message: &str) -> Result<(), StoreError>;

    /// All donations in storage order.
    fn list(&self) -> Result<Vec<Donation>, StoreError>;

    /// Number of donations per status key, in first-seen order.
    fn count_by_status(&self) -> Result<IndexMap<String, usize>, StoreError> {
        let mut counts = IndexMap::new();
        for donation in self.list()? {
            *counts.entry(donation.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// A store shared between the admin service and its action handlers.
pub type SharedStore<S> = Rc<RefCell<S>>;

/// Wraps a store for sharing.
pub fn shared<S: DonationStore>(store: S) -> SharedStore<S> {
    Rc::new(RefCell::new(store))
}

/// Each call borrows the inner store only for its own duration, so observers
/// that read the store between items of a batch see the batch so far.
impl<S: DonationStore + ?Sized> DonationStore for SharedStore<S> {
    fn get(&self, id: TargetId) -> Result<Option<Donation>, StoreError> {
        self.borrow().get(id)
    }

    fn update_status(
        &mut self,
        id: TargetId,
        status: &str,
    ) -> Result<Option<StatusChange>, StoreError> {
        self.borrow_mut().update_status(id, status)
    }

    fn append_log(&mut self, id: TargetId, message: &str) -> Result<(), StoreError> {
        self.borrow_mut().append_log(id, message)
    }

    fn list(&self) -> Result<Vec<Donation>, StoreError> {
        self.borrow().list()
    }
}

/// Ordered in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    donations: IndexMap<TargetId, Donation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_donations(donations: impl IntoIterator<Item = Donation>) -> Self {
        Self {
            donations: donations.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// Inserts or replaces a donation.
    pub fn insert(&mut self, donation: Donation) -> Option<Donation> {
        self.donations.insert(donation.id, donation)
    }

    pub fn len(&self) -> usize {
        self.donations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donations.is_empty()
    }

    /// Loads a JSON array of donations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        let donations: Vec<Donation> = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), count = donations.len(), "donations loaded");
        Ok(Self::from_donations(donations))
    }

    /// Writes all donations to `path` as a JSON array.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let donations: Vec<&Donation> = self.donations.values().collect();
        let content = serde_json::to_string_pretty(&donations)?;
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), count = donations.len(), "donations saved");
        Ok(())
    }

    fn entry_mut(&mut self, id: TargetId) -> Result<&mut Donation, StoreError> {
        self.donations.get_mut(&id).ok_or(StoreError::NotFound(id))
    }
}

impl DonationStore for MemoryStore {
    fn get(&self, id: TargetId) -> Result<Option<Donation>, StoreError> {
        Ok(self.donations.get(&id).cloned())
    }

    fn update_status(
        &mut self,
        id: TargetId,
        status: &str,
    ) -> Result<Option<StatusChange>, StoreError> {
        let donation = self.entry_mut(id)?;
        if donation.status == status {
            return Ok(None);
        }

        let change = StatusChange {
            id,
            from: std::mem::replace(&mut donation.status, status.to_string()),
            to: status.to_string(),
        };
        donation.log.push(change.log_message());
        Ok(Some(change))
    }

    fn append_log(&mut self, id: TargetId, message: &str) -> Result<(), StoreError> {
        self.entry_mut(id)?.log.push(message.to_string());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Donation>, StoreError> {
        Ok(self.donations.values().cloned().collect())
    }
}
