//! The action registry.
//!
//! # Tables
//!
//! | Table | Shape | Notes |
//! |-------|-------|-------|
//! | `actions` | key → [`ActionRecord`] | insertion ordered, keys unique |
//! | `groups` | group → keys | insertion ordered; a group never disappears once created |
//!
//! The empty-string group is present from construction.
//!
//! # Build, then read
//!
//! Registration is the only mutation and needs `&mut self`. Everything else,
//! including dispatch, takes `&self`. An owner registers during setup and then
//! hands out shared references, which freezes the tables for the rest of the
//! process run.

use indexmap::IndexMap;

use crate::availability::is_available;
use crate::{
    ActionContext, ActionRecord, ActionSpec, DispatchError, DispatchOutcome, Dispatcher,
    RegisterError, TargetId,
};

/// Table of registered actions plus their group index.
#[derive(Debug)]
pub struct ActionRegistry {
    kind: String,
    actions: IndexMap<String, ActionRecord>,
    groups: IndexMap<String, Vec<String>>,
}

impl ActionRegistry {
    /// Creates an empty registry for one logical area.
    ///
    /// `kind` names the area (`"donation"`, `"campaign"`, ...) and prefixes the
    /// events published by dispatch.
    pub fn new(kind: impl Into<String>) -> Self {
        let mut groups = IndexMap::new();
        groups.insert(String::new(), Vec::new());
        Self {
            kind: kind.into(),
            actions: IndexMap::new(),
            groups,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Registers an action, returning `false` if it was rejected.
    ///
    /// Rejections (duplicate key, missing label, missing callback) leave both
    /// tables untouched. Use [`try_register`](Self::try_register) to learn why.
    pub fn register(&mut self, key: impl Into<String>, spec: ActionSpec) -> bool {
        match self.try_register(key, spec) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(kind = %self.kind, error = %err, "action registration rejected");
                false
            }
        }
    }

    /// Registers an action, returning the reason on rejection.
    pub fn try_register(
        &mut self,
        key: impl Into<String>,
        spec: ActionSpec,
    ) -> Result<(), RegisterError> {
        let key = key.into();

        if self.actions.contains_key(&key) {
            return Err(RegisterError::DuplicateKey(key));
        }

        let Some(label) = spec.label.clone() else {
            return Err(RegisterError::MissingLabel(key));
        };
        let Some(callback) = spec.callback.clone() else {
            return Err(RegisterError::MissingCallback(key));
        };

        let record = ActionRecord::from_parts(key.clone(), label, callback, spec);

        self.groups
            .entry(record.group().to_string())
            .or_default()
            .push(key.clone());

        tracing::debug!(kind = %self.kind, action = %key, group = %record.group(), "action registered");
        self.actions.insert(key, record);

        Ok(())
    }

    /// Returns the full action table in registration order.
    pub fn get_actions(&self) -> &IndexMap<String, ActionRecord> {
        &self.actions
    }

    pub fn get_action(&self, key: &str) -> Option<&ActionRecord> {
        self.actions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the group index, including empty groups.
    pub fn get_groups(&self) -> &IndexMap<String, Vec<String>> {
        &self.groups
    }

    /// Actions that currently apply to `target`, in registration order.
    pub fn get_available_actions(
        &self,
        target: TargetId,
        ctx: &ActionContext,
    ) -> IndexMap<&str, &ActionRecord> {
        self.actions
            .iter()
            .filter(|(_, record)| is_available(record, target, ctx))
            .map(|(key, record)| (key.as_str(), record))
            .collect()
    }

    /// Groups with at least one member that currently applies to `target`.
    ///
    /// Membership lists are returned unfiltered. Callers still check each
    /// member before rendering it.
    pub fn get_available_groups(
        &self,
        target: TargetId,
        ctx: &ActionContext,
    ) -> IndexMap<&str, &[String]> {
        self.groups
            .iter()
            .filter(|(_, keys)| {
                keys.iter().any(|key| {
                    self.actions
                        .get(key)
                        .is_some_and(|record| is_available(record, target, ctx))
                })
            })
            .map(|(group, keys)| (group.as_str(), keys.as_slice()))
            .collect()
    }

    /// Runs one action without publishing events.
    ///
    /// Shorthand for `Dispatcher::new(self).do_action(..)`.
    pub fn do_action(
        &self,
        key: &str,
        target: TargetId,
        ctx: &ActionContext,
    ) -> Result<DispatchOutcome, DispatchError> {
        Dispatcher::new(self).do_action(key, target, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageCode, DEFAULT_GROUP};

    fn spec(label: &str) -> ActionSpec {
        ActionSpec::new().label(label).callback(|_, _| true)
    }

    #[test]
    fn test_new_registry_has_empty_group() {
        let registry = ActionRegistry::new("donation");
        assert_eq!(registry.kind(), "donation");
        assert!(registry.is_empty());
        assert_eq!(registry.get_groups().len(), 1);
        assert!(registry.get_groups()[""].is_empty());
    }

    #[test]
    fn test_register_adds_to_default_group() {
        let mut registry = ActionRegistry::new("donation");
        assert!(registry.register("a", spec("A")));
        assert!(registry.register("b", spec("B")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_groups()[DEFAULT_GROUP], vec!["a", "b"]);
    }

    #[test]
    fn test_register_named_group() {
        let mut registry = ActionRegistry::new("donation");
        registry.register("a", spec("A").group("emails"));
        registry.register("b", spec("B"));

        let groups: Vec<&str> = registry.get_groups().keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["", "emails", DEFAULT_GROUP]);
        assert_eq!(registry.get_groups()["emails"], vec!["a"]);
    }

    #[test]
    fn test_duplicate_keeps_first_record() {
        let mut registry = ActionRegistry::new("donation");
        assert!(registry.register("a", spec("First").success_message(MessageCode(1))));
        assert_eq!(
            registry.try_register("a", spec("Second").group("other")),
            Err(RegisterError::DuplicateKey("a".into()))
        );

        let record = registry.get_action("a").unwrap();
        assert_eq!(record.label(), "First");
        assert_eq!(record.success_message(), Some(MessageCode(1)));
        assert!(!registry.get_groups().contains_key("other"));
        assert_eq!(registry.get_groups()[DEFAULT_GROUP], vec!["a"]);
    }

    #[test]
    fn test_missing_fields_rejected_without_side_effects() {
        let mut registry = ActionRegistry::new("donation");

        assert_eq!(
            registry.try_register("no_label", ActionSpec::new().callback(|_, _| true).group("g")),
            Err(RegisterError::MissingLabel("no_label".into()))
        );
        assert_eq!(
            registry.try_register("no_callback", ActionSpec::new().label("X").group("g")),
            Err(RegisterError::MissingCallback("no_callback".into()))
        );
        assert!(!registry.register("neither", ActionSpec::new()));

        assert!(registry.is_empty());
        assert_eq!(registry.get_groups().len(), 1);
    }

    #[test]
    fn test_group_persists_when_all_members_unavailable() {
        let mut registry = ActionRegistry::new("donation");
        registry.register("a", spec("A").group("g").active_when(|_, _| false));

        assert!(registry.get_groups().contains_key("g"));
        let available = registry.get_available_groups(1, &ActionContext::new());
        assert!(!available.contains_key("g"));
    }

    #[test]
    fn test_available_actions_preserve_order() {
        let mut registry = ActionRegistry::new("donation");
        registry.register("c", spec("C"));
        registry.register("a", spec("A").active_when(|id, _| id % 2 == 0));
        registry.register("b", spec("B"));

        let ctx = ActionContext::new();
        let even: Vec<&str> = registry.get_available_actions(2, &ctx).into_keys().collect();
        let odd: Vec<&str> = registry.get_available_actions(3, &ctx).into_keys().collect();

        assert_eq!(even, vec!["c", "a", "b"]);
        assert_eq!(odd, vec!["c", "b"]);
    }

    #[test]
    fn test_available_groups_return_unfiltered_members() {
        let mut registry = ActionRegistry::new("donation");
        registry.register("on", spec("On").group("g"));
        registry.register("off", spec("Off").group("g").active_when(|_, _| false));
        registry.register("lonely", spec("Lonely").group("h").active_when(|_, _| false));

        let groups = registry.get_available_groups(1, &ActionContext::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["g"], ["on".to_string(), "off".to_string()]);
    }
}
