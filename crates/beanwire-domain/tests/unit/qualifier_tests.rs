//! Tests for qualifier values

use beanwire_domain::value_objects::{MemberValue, Qualifier, QualifierType, ScopeKind};
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn test_non_binding_members_ignored_by_equality_and_hash() {
    let priority = Arc::new(QualifierType::new("Priority").with_non_binding("comment"));
    let a = Qualifier::of(&priority)
        .with("level", 1_i64)
        .with("comment", "first");
    let b = Qualifier::of(&priority)
        .with("level", 1_i64)
        .with("comment", "second");
    let c = Qualifier::of(&priority).with("level", 2_i64);

    assert_eq!(a, b);
    assert_ne!(a, c);
    let set: HashSet<Qualifier> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_same_name_different_binding_member() {
    let named_a = Qualifier::named("a");
    let named_b = Qualifier::named("b");

    assert_ne!(named_a, named_b);
    assert_eq!(named_a, Qualifier::named("a"));
    assert_eq!(named_a.member("value"), Some(&MemberValue::from("a")));
}

#[test]
fn test_scope_notification_qualifiers_carry_the_scope() {
    let request = Qualifier::initialized(&ScopeKind::Request);
    let session = Qualifier::initialized(&ScopeKind::Session);

    assert_ne!(request, session);
    assert_ne!(request, Qualifier::destroyed(&ScopeKind::Request));
    assert_eq!(request.to_string(), "@Initialized(value=RequestScoped)");
}

#[test]
fn test_well_known_qualifiers() {
    assert!(Qualifier::any().is_any());
    assert!(!Qualifier::default_qualifier().is_any());
    assert_eq!(Qualifier::default_qualifier().to_string(), "@Default");
}

#[test]
fn test_qualifier_type_flags() {
    let marker = QualifierType::plain_annotation("Marker");
    let tag = QualifierType::new("Tag").repeatable();

    assert!(!marker.is_qualifier());
    assert!(tag.is_qualifier());
    assert!(tag.is_repeatable());
    assert!(!QualifierType::new("Updated").is_repeatable());
}

#[test]
fn test_member_value_display() {
    let list = MemberValue::List(vec![MemberValue::Int(1), MemberValue::from("x")]);

    assert_eq!(list.to_string(), "{1, \"x\"}");
    assert_eq!(MemberValue::Enum("HIGH".into()).to_string(), "HIGH");
    assert_eq!(MemberValue::from(true).to_string(), "true");
}

#[test]
fn test_qualifier_serializes_with_members() {
    let urgent = Arc::new(QualifierType::new("Urgent"));
    let qualifier = Qualifier::of(&urgent).with("level", 3_i64);

    let json = serde_json::to_string(&qualifier).unwrap();
    let restored: Qualifier = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, qualifier);
    assert_eq!(restored.kind(), "Urgent");
}
