//! Container Bootstrap Tests

use crate::support::{Counters, Recorder, counted_bean, extension_observer, recording};
use beanwire_application::{ObserverFailure, ObserverMethod};
use beanwire_domain::entities::{
    BeanMetadata, FiredEvent, ObserverDescriptor, TransactionPhase,
};
use beanwire_domain::error::Error;
use beanwire_domain::events::{ContainerLifecycleEvent, ScopeBoundary};
use beanwire_domain::ports::{TransactionOutcome, TransactionServices};
use beanwire_domain::value_objects::{BeanId, Qualifier, ScopeKind, TypeDescriptor};
use beanwire_infrastructure::config::AppConfig;
use beanwire_infrastructure::di::{ContainerBuilder, init_test_container};
use beanwire_infrastructure::infrastructure::{LocalTransactionManager, SerdeSerializationFacility};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct Cart {
    items: Vec<String>,
}

#[derive(Debug)]
struct Basket;

struct Order(u32);

fn order_type() -> TypeDescriptor {
    TypeDescriptor::class("Order")
}

fn cart_bean(counters: &Counters) -> beanwire_application::ContextualType {
    counted_bean(
        BeanMetadata::new("Cart", ScopeKind::Session).passivation_capable("cart"),
        counters,
        || Cart { items: Vec::new() },
    )
}

#[test]
fn test_container_events_reach_extensions_in_order() {
    let recorder = Recorder::default();
    let mut builder = ContainerBuilder::new(AppConfig::default());
    for kind in [
        ContainerLifecycleEvent::BeforeShutdown,
        ContainerLifecycleEvent::AfterDeploymentValidation,
        ContainerLifecycleEvent::AfterBeanDiscovery,
        ContainerLifecycleEvent::BeforeBeanDiscovery,
    ] {
        builder = builder.observer(extension_observer(kind, &recorder));
    }

    let container = builder.build().unwrap();
    assert_eq!(
        recorder.entries(),
        vec![
            "BeforeBeanDiscovery",
            "AfterBeanDiscovery",
            "AfterDeploymentValidation"
        ]
    );

    container.shutdown().unwrap();
    assert_eq!(recorder.entries().last().map(String::as_str), Some("BeforeShutdown"));
    assert!(container.is_shut_down());
}

#[test]
fn test_application_boundaries_announced() {
    let recorder = Recorder::default();
    let boundary = |method: &str, qualifier: Qualifier| {
        recording(
            ObserverDescriptor::new("Watcher", method, ScopeBoundary::type_descriptor())
                .with_qualifiers([qualifier]),
            &recorder,
        )
    };
    let container = ContainerBuilder::new(AppConfig::default())
        .observer(boundary(
            "initialized",
            Qualifier::initialized(&ScopeKind::Application),
        ))
        .observer(boundary(
            "destroyed",
            Qualifier::destroyed(&ScopeKind::Application),
        ))
        .build()
        .unwrap();

    assert_eq!(recorder.entries(), vec!["initialized"]);
    container.shutdown().unwrap();
    assert_eq!(recorder.entries(), vec!["initialized", "destroyed"]);
    assert!(!container.contexts().is_active(&ScopeKind::Application));
}

#[test]
fn test_definition_problems_abort_build() {
    let counters = Counters::default();
    let result = ContainerBuilder::new(AppConfig::default())
        .bean(counted_bean(
            BeanMetadata::new("Wizard", ScopeKind::Conversation),
            &counters,
            || Basket,
        ))
        .build();

    match result {
        Err(Error::Definition { problems }) => {
            assert_eq!(problems.len(), 1);
            assert!(problems[0].contains("Wizard"));
        }
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn test_passivation_checks_can_be_disabled() {
    let counters = Counters::default();
    let mut config = AppConfig::default();
    config.contexts.validate_passivation = false;

    let container = ContainerBuilder::new(config)
        .bean(counted_bean(
            BeanMetadata::new("Wizard", ScopeKind::Conversation),
            &counters,
            || Basket,
        ))
        .build();

    assert!(container.is_ok());
}

#[test]
fn test_failing_extension_aborts_build() {
    let observer = ObserverMethod::new(
        ObserverDescriptor::new(
            "Extension",
            "veto",
            ContainerLifecycleEvent::AfterBeanDiscovery.type_descriptor(),
        )
        .for_extension(),
        |_| Err(ObserverFailure::checked("deployment vetoed")),
    );

    let err = ContainerBuilder::new(AppConfig::default())
        .observer(observer)
        .build()
        .unwrap_err();

    assert!(err.is_observer_failure());
}

#[test]
fn test_session_bean_shared_within_session() {
    let counters = Counters::default();
    let container = ContainerBuilder::new(AppConfig::default())
        .with_serialization(Arc::new(SerdeSerializationFacility::new().with_type::<Cart>()))
        .bean(cart_bean(&counters))
        .build()
        .unwrap();
    let cart = container.reference(&BeanId::new("Cart")).unwrap();
    let session = container.new_session();

    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    let first = cart.get().unwrap();
    unit.end().unwrap();
    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    let second = cart.get().unwrap();
    unit.end().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counters.created(), 1);

    container.invalidate_session(&session);
    assert_eq!(counters.destroyed(), 1);
}

#[test]
fn test_unserializable_session_instance_rejected() {
    let counters = Counters::default();
    let container = ContainerBuilder::new(AppConfig::default())
        .with_serialization(Arc::new(SerdeSerializationFacility::new()))
        .bean(counted_bean(
            BeanMetadata::new("Basket", ScopeKind::Session).passivation_capable("basket"),
            &counters,
            || Basket,
        ))
        .build()
        .unwrap();
    let session = container.new_session();

    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    let result = container.reference(&BeanId::new("Basket")).unwrap().get();
    unit.end().unwrap();

    assert!(matches!(result, Err(Error::NotSerializable { .. })));
}

#[test]
fn test_transactional_observers_follow_local_transactions() {
    let recorder = Recorder::default();
    let transactions = Arc::new(LocalTransactionManager::new());
    let phase = |method: &str, phase: TransactionPhase| {
        recording(
            ObserverDescriptor::new("Audit", method, order_type()).with_phase(phase),
            &recorder,
        )
    };
    let container = ContainerBuilder::new(AppConfig::default())
        .with_transactions(transactions.clone())
        .observer(phase("now", TransactionPhase::InProgress))
        .observer(phase("success", TransactionPhase::AfterSuccess))
        .observer(phase("failure", TransactionPhase::AfterFailure))
        .build()
        .unwrap();

    transactions.begin().unwrap();
    container.fire(FiredEvent::new(Order(1), order_type())).unwrap();
    assert_eq!(recorder.entries(), vec!["now"]);
    assert_eq!(transactions.commit().unwrap(), TransactionOutcome::Committed);
    assert_eq!(recorder.entries(), vec!["now", "success"]);

    transactions.begin().unwrap();
    container.fire(FiredEvent::new(Order(2), order_type())).unwrap();
    transactions.rollback().unwrap();
    assert_eq!(recorder.entries(), vec!["now", "success", "now", "failure"]);
}

#[test]
fn test_shutdown_ends_sessions_and_refuses_new_units() {
    let counters = Counters::default();
    let container = ContainerBuilder::new(AppConfig::default())
        .with_serialization(Arc::new(SerdeSerializationFacility::new().with_type::<Cart>()))
        .bean(cart_bean(&counters))
        .build()
        .unwrap();
    let session = container.new_session();
    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    container.reference(&BeanId::new("Cart")).unwrap().get().unwrap();
    unit.end().unwrap();

    container.shutdown().unwrap();
    container.shutdown().unwrap();

    assert!(session.is_invalidated());
    assert_eq!(counters.destroyed(), 1);
    assert!(container.begin_unit_of_work(None, None).is_err());
}

#[test]
fn test_event_handle_fires_through_container() {
    let recorder = Recorder::default();
    let container = ContainerBuilder::new(AppConfig::default())
        .observer(recording(
            ObserverDescriptor::new("Audit", "onOrder", order_type()),
            &recorder,
        ))
        .build()
        .unwrap();

    container.event_handle(order_type()).fire(Order(3)).unwrap();

    assert_eq!(recorder.entries(), vec!["onOrder"]);
}

#[test]
fn test_empty_container() {
    let container = init_test_container().unwrap();
    assert!(container.beans().is_empty());
    assert!(container.observers().is_empty());
    assert!(container.contexts().is_active(&ScopeKind::Application));
    assert!(!container.transactions().is_transaction_active());
}
