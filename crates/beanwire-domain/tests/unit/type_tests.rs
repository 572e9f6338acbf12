//! Tests for type descriptors and scopes

use beanwire_domain::value_objects::{ClassId, ScopeKind, TypeDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

fn list_of(arg: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::parameterized("List", [arg])
}

#[test]
fn test_display() {
    let ty = TypeDescriptor::parameterized(
        "Map",
        [
            TypeDescriptor::class("String"),
            list_of(TypeDescriptor::wildcard_extends(TypeDescriptor::class("Number"))),
        ],
    );

    assert_eq!(ty.to_string(), "Map<String, List<? extends Number>>");
    assert_eq!(
        TypeDescriptor::bounded_variable("T", TypeDescriptor::class("Number")).to_string(),
        "T extends Number"
    );
    assert_eq!(TypeDescriptor::wildcard_super(TypeDescriptor::class("Integer")).to_string(), "? super Integer");
}

#[test]
fn test_contains_type_variable() {
    assert!(list_of(TypeDescriptor::variable("E")).contains_type_variable());
    assert!(
        list_of(TypeDescriptor::wildcard_extends(TypeDescriptor::variable("E")))
            .contains_type_variable()
    );
    assert!(!list_of(TypeDescriptor::class("String")).contains_type_variable());
    assert!(!TypeDescriptor::wildcard().contains_type_variable());
}

#[test]
fn test_substitute_leaves_unbound_variables() {
    let ty = TypeDescriptor::parameterized(
        "Map",
        [TypeDescriptor::variable("K"), TypeDescriptor::variable("V")],
    );
    let bindings: HashMap<Arc<str>, TypeDescriptor> =
        HashMap::from([(Arc::from("K"), TypeDescriptor::class("String"))]);

    let substituted = ty.substitute(&bindings);

    assert_eq!(
        substituted,
        TypeDescriptor::parameterized(
            "Map",
            [TypeDescriptor::class("String"), TypeDescriptor::variable("V")]
        )
    );
}

#[test]
fn test_erasure() {
    assert_eq!(
        list_of(TypeDescriptor::class("String")).erasure(),
        TypeDescriptor::class("List")
    );
    assert_eq!(TypeDescriptor::variable("T").erasure(), TypeDescriptor::object());
    assert_eq!(
        TypeDescriptor::bounded_variable("T", list_of(TypeDescriptor::variable("E"))).erasure(),
        TypeDescriptor::class("List")
    );
    assert_eq!(TypeDescriptor::wildcard().raw_class(), None);
    assert_eq!(
        list_of(TypeDescriptor::class("String")).raw_class(),
        Some(&ClassId::new("List"))
    );
}

#[test]
fn test_scope_kinds() {
    let batch = ScopeKind::custom("BatchScoped", true);

    assert!(!ScopeKind::Dependent.is_normal());
    assert!(ScopeKind::Request.is_normal());
    assert!(!ScopeKind::Request.is_passivating());
    assert!(ScopeKind::Session.is_passivating());
    assert!(ScopeKind::Conversation.is_passivating());
    assert!(!ScopeKind::Application.is_passivating());
    assert!(batch.is_normal());
    assert!(batch.is_passivating());
    assert_eq!(batch.to_string(), "BatchScoped");
    assert_eq!(ScopeKind::default(), ScopeKind::Dependent);
}
