//! Availability evaluation.

use crate::{ActionContext, ActionRecord, TargetId};

/// Decides whether `record` currently applies to `target`.
///
/// An action without an active callback is always available. Otherwise the
/// predicate decides. Nothing is cached: the predicate runs on every call, so
/// a state change made by an earlier dispatch is visible to the next check.
pub fn is_available(record: &ActionRecord, target: TargetId, ctx: &ActionContext) -> bool {
    match record.active_callback() {
        None => true,
        Some(predicate) => predicate(target, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionRegistry, ActionSpec};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_no_predicate_is_always_available() {
        let mut registry = ActionRegistry::new("test");
        registry.register("always", ActionSpec::new().label("Always").callback(|_, _| true));
        let record = registry.get_action("always").unwrap();

        assert!(is_available(record, 0, &ActionContext::new()));
        assert!(is_available(record, u64::MAX, &ActionContext::new()));
    }

    #[test]
    fn test_predicate_sees_target_and_context() {
        let mut registry = ActionRegistry::new("test");
        registry.register(
            "flagged",
            ActionSpec::new()
                .label("Flagged")
                .callback(|_, _| true)
                .active_when(|id, ctx| id == 5 && ctx.get_bool("flag") == Some(true)),
        );
        let record = registry.get_action("flagged").unwrap();

        let flagged = ActionContext::new().with("flag", serde_json::json!(true));
        assert!(is_available(record, 5, &flagged));
        assert!(!is_available(record, 6, &flagged));
        assert!(!is_available(record, 5, &ActionContext::new()));
    }

    #[test]
    fn test_predicate_is_not_cached() {
        let open = Rc::new(Cell::new(true));
        let open_clone = open.clone();

        let mut registry = ActionRegistry::new("test");
        registry.register(
            "toggle",
            ActionSpec::new()
                .label("Toggle")
                .callback(|_, _| true)
                .active_when(move |_, _| open_clone.get()),
        );
        let record = registry.get_action("toggle").unwrap();
        let ctx = ActionContext::new();

        assert!(is_available(record, 1, &ctx));
        open.set(false);
        assert!(!is_available(record, 1, &ctx));
    }
}
