//! Tests for entities and lifecycle event types

use beanwire_domain::entities::{
    BeanKind, BeanMetadata, FiredEvent, InjectionPoint, ObserverDescriptor, Reception,
    TransactionPhase,
};
use beanwire_domain::events::{ContainerLifecycleEvent, ScopeBoundary};
use beanwire_domain::value_objects::{Qualifier, ScopeKind, TypeDescriptor};

#[test]
fn test_observer_descriptor_defaults() {
    let descriptor = ObserverDescriptor::new("Listener", "onOrder", TypeDescriptor::class("Order"));

    assert_eq!(descriptor.id.to_string(), "Listener#onOrder");
    assert_eq!(descriptor.reception, Reception::Always);
    assert_eq!(descriptor.phase, TransactionPhase::InProgress);
    assert_eq!(descriptor.scope, ScopeKind::Dependent);
    assert_eq!(descriptor.event_parameters, 1);
    assert!(!descriptor.is_transactional());
    assert_eq!(descriptor.bean().as_str(), "Listener");
}

#[test]
fn test_observer_descriptor_drops_any() {
    let descriptor = ObserverDescriptor::new("Listener", "onOrder", TypeDescriptor::class("Order"))
        .with_qualifiers([Qualifier::any(), Qualifier::named("x")])
        .with_phase(TransactionPhase::AfterSuccess);

    assert_eq!(&*descriptor.qualifiers, &[Qualifier::named("x")]);
    assert!(descriptor.is_transactional());
}

#[test]
fn test_extension_observers_are_application_scoped() {
    let descriptor = ObserverDescriptor::new(
        "Extension",
        "afterDiscovery",
        ContainerLifecycleEvent::AfterBeanDiscovery.type_descriptor(),
    )
    .for_extension();

    assert!(descriptor.extension);
    assert_eq!(descriptor.scope, ScopeKind::Application);
}

#[test]
fn test_bean_metadata_builder() {
    let bean = BeanMetadata::new("Cart", ScopeKind::Session)
        .with_kind(BeanKind::Managed)
        .with_injection_point(
            InjectionPoint::new("Cart", TypeDescriptor::class("Helper"))
                .resolved_to("Helper")
                .transient_reference(),
        )
        .passivation_capable("cart");

    assert!(bean.enabled);
    assert!(bean.is_passivation_capable());
    assert_eq!(bean.injection_points.len(), 1);
    assert!(bean.injection_points[0].transient);
    assert!(!BeanMetadata::new("Off", ScopeKind::Request).disabled().enabled);
}

#[test]
fn test_fired_event_builder() {
    let event = FiredEvent::new(42_u32, TypeDescriptor::class("Integer"))
        .with_qualifier(Qualifier::named("answer"))
        .with_type_hint(TypeDescriptor::class("Integer"));

    assert_eq!(event.payload().downcast_ref::<u32>(), Some(&42));
    assert_eq!(event.qualifiers(), &[Qualifier::named("answer")]);
    assert_eq!(event.type_hint(), Some(&TypeDescriptor::class("Integer")));
    assert!(event.injection_point().is_none());
}

#[test]
fn test_container_lifecycle_types() {
    let names: Vec<&str> = ContainerLifecycleEvent::ALL
        .iter()
        .map(|e| e.class_name())
        .collect();

    assert_eq!(names.len(), 6);
    assert!(names.contains(&"BeforeShutdown"));
    assert_eq!(
        ContainerLifecycleEvent::BeforeShutdown.type_descriptor(),
        TypeDescriptor::class("BeforeShutdown")
    );
    assert_eq!(ScopeBoundary::type_descriptor(), TypeDescriptor::class("ScopeBoundary"));
}
