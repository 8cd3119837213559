//! Action handler types.
//!
//! A handler is the externally owned logic behind an action. The registry
//! never looks inside it: it only calls [`ActionHandler::handle`] with the
//! target id and the request context, and reads back a success flag.
//!
//! Handlers take `&self`. Records are shared and immutable after the build
//! phase, so a handler that needs to mutate something (a store, a counter)
//! holds it behind interior mutability (`RefCell`, `Cell`).
//!
//! # Core Types
//!
//! - [`ActionHandler`]: trait for handlers implemented on a type
//! - [`FnHandler`]: adapter turning a closure into a handler
//! - [`ActivePredicate`]: shared availability predicate

use std::fmt;
use std::rc::Rc;

use crate::{ActionContext, TargetId};

/// Shared availability predicate: `(target, context) -> applies?`.
pub type ActivePredicate = Rc<dyn Fn(TargetId, &ActionContext) -> bool>;

/// Trait for action handlers.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use almoner_dispatch::{ActionContext, ActionHandler, TargetId};
///
/// struct Touch { count: Cell<u32> }
///
/// impl ActionHandler for Touch {
///     fn handle(&self, _target: TargetId, _ctx: &ActionContext) -> bool {
///         self.count.set(self.count.get() + 1);
///         true
///     }
/// }
///
/// let touch = Touch { count: Cell::new(0) };
/// assert!(touch.handle(1, &ActionContext::new()));
/// assert_eq!(touch.count.get(), 1);
/// ```
pub trait ActionHandler {
    /// Runs the action against `target`, returning whether it succeeded.
    fn handle(&self, target: TargetId, ctx: &ActionContext) -> bool;
}

/// A wrapper that implements [`ActionHandler`] for closures.
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(TargetId, &ActionContext) -> bool,
{
    /// Creates a new FnHandler wrapping the given closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(TargetId, &ActionContext) -> bool,
{
    fn handle(&self, target: TargetId, ctx: &ActionContext) -> bool {
        (self.f)(target, ctx)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_fn_handler_passes_arguments() {
        let handler = FnHandler::new(|target, ctx: &ActionContext| {
            target == 5 && ctx.get_bool("force") == Some(true)
        });

        let ctx = ActionContext::new().with("force", json!(true));
        assert!(handler.handle(5, &ctx));
        assert!(!handler.handle(6, &ctx));
        assert!(!handler.handle(5, &ActionContext::new()));
    }

    #[test]
    fn test_fn_handler_interior_mutation() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();

        let handler = FnHandler::new(move |_, _: &ActionContext| {
            calls_clone.set(calls_clone.get() + 1);
            false
        });

        let ctx = ActionContext::new();
        assert!(!handler.handle(1, &ctx));
        assert!(!handler.handle(2, &ctx));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let handler: Rc<dyn ActionHandler> = Rc::new(FnHandler::new(|t, _: &ActionContext| t > 10));
        assert!(handler.handle(11, &ActionContext::new()));
        assert!(!handler.handle(10, &ActionContext::new()));
    }
}
