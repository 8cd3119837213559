use std::cell::{Cell, RefCell};
use std::rc::Rc;

use almoner_dispatch::{
    serialize_structured, ActionContext, ActionRegistry, ActionSpec, ActionSummary, Dispatcher,
    DispatchOutcome, EventBus, MessageCode, OutputMode,
};

fn resend_registry(calls: Rc<Cell<u32>>) -> ActionRegistry {
    let mut registry = ActionRegistry::new("donation");
    assert!(registry.register(
        "resend_receipt",
        ActionSpec::new()
            .label("Resend")
            .callback(move |_, _| {
                calls.set(calls.get() + 1);
                true
            })
            .success_message(MessageCode(11))
            .active_when(|id, _| id != 99),
    ));
    registry
}

#[test]
fn resend_receipt_end_to_end() {
    let calls = Rc::new(Cell::new(0));
    let registry = resend_registry(calls.clone());
    let ctx = ActionContext::new();

    assert!(!registry.get_available_actions(99, &ctx).contains_key("resend_receipt"));
    assert!(registry.get_available_actions(5, &ctx).contains_key("resend_receipt"));

    let outcome = registry.do_action("resend_receipt", 5, &ctx).unwrap();
    assert_eq!(outcome, DispatchOutcome::executed(true, Some(MessageCode(11))));
    assert_eq!(calls.get(), 1);

    let blocked = registry.do_action("resend_receipt", 99, &ctx).unwrap();
    assert_eq!(blocked, DispatchOutcome::Unavailable);
    assert_eq!(calls.get(), 1);
}

#[test]
fn availability_tracks_state_changed_by_earlier_dispatch() {
    // A one-shot action: available until it has run once for a target.
    let done: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));
    let done_for_handler = done.clone();
    let done_for_predicate = done.clone();

    let mut registry = ActionRegistry::new("donation");
    registry.register(
        "approve",
        ActionSpec::new()
            .label("Approve")
            .callback(move |id, _| {
                done_for_handler.borrow_mut().push(id);
                true
            })
            .active_when(move |id, _| !done_for_predicate.borrow().contains(&id)),
    );

    let ctx = ActionContext::new();
    assert!(registry.do_action("approve", 3, &ctx).unwrap().succeeded());
    assert_eq!(
        registry.do_action("approve", 3, &ctx).unwrap(),
        DispatchOutcome::Unavailable
    );
    assert!(registry.get_available_actions(3, &ctx).is_empty());
    assert!(registry.get_available_groups(3, &ctx).is_empty());
    assert_eq!(registry.get_available_groups(4, &ctx).len(), 1);
}

#[test]
fn dispatcher_with_events_reports_to_observers() {
    let calls = Rc::new(Cell::new(0));
    let registry = resend_registry(calls);

    let names = Rc::new(RefCell::new(Vec::new()));
    let names_clone = names.clone();
    let events = EventBus::new().subscribe(move |e| names_clone.borrow_mut().push(e.name.clone()));

    let dispatcher = Dispatcher::new(&registry).with_events(&events);
    let ctx = ActionContext::new();
    dispatcher.do_action("resend_receipt", 1, &ctx).unwrap();
    dispatcher.do_action("resend_receipt", 99, &ctx).unwrap();

    assert_eq!(*names.borrow(), vec!["donation_admin_action_resend_receipt"]);
}

#[test]
fn summaries_render_as_structured_output() {
    let registry = resend_registry(Rc::new(Cell::new(0)));
    let summaries: Vec<ActionSummary> = registry
        .get_available_actions(1, &ActionContext::new())
        .values()
        .map(|record| record.summary())
        .collect();

    let json = serialize_structured("actions", &summaries, OutputMode::Json).unwrap();
    assert!(json.contains("\"key\": \"resend_receipt\""));

    let csv = serialize_structured("actions", &summaries, OutputMode::Csv).unwrap();
    assert_eq!(csv, "key,label,group\nresend_receipt,Resend,default\n");
}

#[test]
fn csv_listing_keeps_button_text_from_later_actions() {
    let mut registry = ActionRegistry::new("donation");
    registry.register("plain", ActionSpec::new().label("Plain").callback(|_, _| true));
    registry.register(
        "btn",
        ActionSpec::new()
            .label("Btn")
            .button_text("Go")
            .callback(|_, _| true),
    );

    let summaries: Vec<ActionSummary> = registry
        .get_actions()
        .values()
        .map(|record| record.summary())
        .collect();

    let csv = serialize_structured("actions", &summaries, OutputMode::Csv).unwrap();
    assert_eq!(
        csv,
        "key,label,group,button_text\nplain,Plain,default,\nbtn,Btn,default,Go\n"
    );
}
