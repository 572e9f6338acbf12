//! Tests for units of work and scope notifications

use crate::support::{Counters, Fixture, Recorder};
use beanwire_application::{ConversationSettings, ObserverMethod};
use beanwire_domain::entities::{FiredEvent, ObserverDescriptor, TransactionPhase};
use beanwire_domain::events::ScopeBoundary;
use beanwire_domain::value_objects::{Qualifier, ScopeKind, TypeDescriptor};

/// Record every scope boundary as "<qualifier> <scope>"
fn watch(fixture: &Fixture, recorder: &Recorder, qualifiers: &[(&str, Qualifier)]) {
    for (label, qualifier) in qualifiers {
        let recorder = recorder.clone();
        let label = label.to_string();
        fixture.observers.register(ObserverMethod::new(
            ObserverDescriptor::new("ScopeWatcher", label.clone(), ScopeBoundary::type_descriptor())
                .with_qualifiers([qualifier.clone()]),
            move |invocation| {
                if let Some(boundary) = invocation.event::<ScopeBoundary>() {
                    recorder.push(format!("{label} {}", boundary.scope));
                }
                Ok(())
            },
        ));
    }
}

fn request_qualifiers() -> Vec<(&'static str, Qualifier)> {
    vec![
        ("initialized", Qualifier::initialized(&ScopeKind::Request)),
        ("before-destroyed", Qualifier::before_destroyed(&ScopeKind::Request)),
        ("destroyed", Qualifier::destroyed(&ScopeKind::Request)),
    ]
}

#[test]
fn test_request_boundaries_notified_in_order() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(&fixture, &recorder, &request_qualifiers());
    let (lifecycle, _) = fixture.lifecycle(ConversationSettings::default());

    let unit = lifecycle.begin(None, None).unwrap();
    assert_eq!(recorder.entries(), vec!["initialized RequestScoped"]);
    unit.end().unwrap();

    assert_eq!(
        recorder.entries(),
        vec![
            "initialized RequestScoped",
            "before-destroyed RequestScoped",
            "destroyed RequestScoped",
        ]
    );
}

#[test]
fn test_request_instances_destroyed_at_end() {
    let fixture = Fixture::new();
    let counters = Counters::default();
    fixture.bean("Cart", ScopeKind::Request, &counters);
    let (lifecycle, _) = fixture.lifecycle(ConversationSettings::default());

    let unit = lifecycle.begin(None, None).unwrap();
    fixture.contexts.reference(&"Cart".into()).unwrap().get().unwrap();
    assert!(fixture.contexts.is_active(&ScopeKind::Request));
    assert!(!fixture.contexts.is_active(&ScopeKind::Session));
    unit.end().unwrap();

    assert_eq!(counters.destroyed(), 1);
    assert!(!fixture.contexts.is_active(&ScopeKind::Request));
}

#[test]
fn test_nested_unit_of_work_rejected() {
    let fixture = Fixture::new();
    let (lifecycle, _) = fixture.lifecycle(ConversationSettings::default());

    let unit = lifecycle.begin(None, None).unwrap();
    assert!(lifecycle.begin(None, None).is_err());
    assert!(fixture.contexts.is_active(&ScopeKind::Request));
    unit.end().unwrap();
}

#[test]
fn test_session_initialized_once() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(
        &fixture,
        &recorder,
        &[
            ("initialized", Qualifier::initialized(&ScopeKind::Session)),
            ("destroyed", Qualifier::destroyed(&ScopeKind::Session)),
        ],
    );
    let (lifecycle, conversations) = fixture.lifecycle(ConversationSettings::default());
    let session = conversations.create_session(None);

    for _ in 0..3 {
        lifecycle.begin(Some(&session), None).unwrap().end().unwrap();
    }
    lifecycle.invalidate_session(&session);

    assert_eq!(
        recorder.entries(),
        vec!["initialized SessionScoped", "destroyed SessionScoped"]
    );
}

#[test]
fn test_transient_conversation_boundaries() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(
        &fixture,
        &recorder,
        &[
            ("initialized", Qualifier::initialized(&ScopeKind::Conversation)),
            ("destroyed", Qualifier::destroyed(&ScopeKind::Conversation)),
        ],
    );
    let (lifecycle, conversations) = fixture.lifecycle(ConversationSettings::default());
    let session = conversations.create_session(None);

    lifecycle.begin(Some(&session), None).unwrap().end().unwrap();

    assert_eq!(
        recorder.entries(),
        vec!["initialized ConversationScoped", "destroyed ConversationScoped"]
    );
}

#[test]
fn test_dropping_unit_ends_it() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(&fixture, &recorder, &request_qualifiers());
    let counters = Counters::default();
    fixture.bean("Cart", ScopeKind::Request, &counters);
    let (lifecycle, _) = fixture.lifecycle(ConversationSettings::default());

    {
        let _unit = lifecycle.begin(None, None).unwrap();
        fixture.contexts.reference(&"Cart".into()).unwrap().get().unwrap();
    }

    assert_eq!(counters.destroyed(), 1);
    assert_eq!(recorder.count(), 3);
    assert!(lifecycle.begin(None, None).is_ok());
}

#[test]
fn test_application_boundaries() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(
        &fixture,
        &recorder,
        &[
            ("initialized", Qualifier::initialized(&ScopeKind::Application)),
            ("destroyed", Qualifier::destroyed(&ScopeKind::Application)),
        ],
    );
    let counters = Counters::default();
    fixture.bean("Config", ScopeKind::Application, &counters);
    let (lifecycle, _) = fixture.lifecycle(ConversationSettings::default());

    lifecycle.start_application();
    lifecycle.start_application();
    fixture.contexts.reference(&"Config".into()).unwrap().get().unwrap();
    lifecycle.stop_application();

    assert_eq!(counters.destroyed(), 1);
    assert_eq!(
        recorder.entries(),
        vec!["initialized ApplicationScoped", "destroyed ApplicationScoped"]
    );
}

#[test]
fn test_temporary_request_for_deferred_observer_is_announced() {
    let fixture = Fixture::new();
    let recorder = Recorder::default();
    watch(&fixture, &recorder, &request_qualifiers());
    let committed = recorder.clone();
    fixture.observers.register(ObserverMethod::new(
        ObserverDescriptor::new("Billing", "on_commit", TypeDescriptor::class("Order"))
            .with_phase(TransactionPhase::AfterSuccess),
        move |_| {
            committed.push("committed");
            Ok(())
        },
    ));

    fixture.transactions.begin();
    fixture
        .dispatcher
        .fire(FiredEvent::new(42_u32, TypeDescriptor::class("Order")))
        .unwrap();
    assert!(recorder.entries().is_empty());
    fixture.transactions.complete(true);

    assert_eq!(
        recorder.entries(),
        vec![
            "initialized RequestScoped",
            "committed",
            "before-destroyed RequestScoped",
            "destroyed RequestScoped",
        ]
    );
    assert!(fixture.contexts.request().current().is_none());
}
