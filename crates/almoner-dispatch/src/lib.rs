//! Action registry and dispatch engine for admin actions.
//!
//! `almoner-dispatch` holds the domain-agnostic half of the admin tooling: a
//! table of named actions that can be run against a record, the rules that
//! decide whether an action currently applies, and the dispatcher that runs
//! one action and reports what happened.
//!
//! # Features
//!
//! - **Registration**: [`ActionSpec`] describes an action; [`ActionRegistry`]
//!   validates it and files it under a group
//! - **Availability**: optional per-action predicates, evaluated fresh on every call
//! - **Dispatch**: [`Dispatcher`] separates "not registered" (an error) from
//!   "not available" (a quiet no-op) and returns the result message directly
//! - **Events**: fire-and-forget [`EventBus`] notifications for observers
//! - **Output modes**: structured serialization (JSON/YAML/XML/CSV) for listings
//!
//! # Lifecycle
//!
//! A registry is built once per logical area (donations, campaigns, ...) and is
//! read-only afterwards. Registration takes `&mut self`; every query and
//! dispatch takes `&self`, so the borrow checker keeps the build phase and the
//! use phase apart.
//!
//! ```rust
//! use almoner_dispatch::{ActionContext, ActionRegistry, ActionSpec, DispatchOutcome, MessageCode};
//!
//! let mut registry = ActionRegistry::new("donation");
//! assert!(registry.register(
//!     "resend_receipt",
//!     ActionSpec::new()
//!         .label("Resend")
//!         .callback(|_id, _ctx| true)
//!         .active_when(|id, _ctx| id != 99)
//!         .success_message(MessageCode(11)),
//! ));
//!
//! let ctx = ActionContext::new();
//! assert!(registry.get_available_actions(99, &ctx).is_empty());
//!
//! let outcome = registry.do_action("resend_receipt", 5, &ctx)?;
//! assert_eq!(outcome, DispatchOutcome::executed(true, Some(MessageCode(11))));
//! # Ok::<(), almoner_dispatch::DispatchError>(())
//! ```

mod action;
mod availability;
mod context;
mod dispatch;
mod error;
mod events;
mod handler;
mod output;
mod registry;
mod serialize;

pub use action::{ActionRecord, ActionSpec, ActionSummary, MessageCode, TargetId, DEFAULT_GROUP};

pub use availability::is_available;

pub use context::{parse_arg, ActionContext};

pub use dispatch::{DispatchOutcome, DispatchResult, Dispatcher};

pub use error::{DispatchError, RegisterError};

pub use events::{Event, EventBus, SubscriberFn};

pub use handler::{ActionHandler, ActivePredicate, FnHandler};

pub use output::OutputMode;

pub use registry::ActionRegistry;

pub use serialize::{serialize_csv, serialize_structured, to_json, to_xml, to_yaml, SerializeError};
