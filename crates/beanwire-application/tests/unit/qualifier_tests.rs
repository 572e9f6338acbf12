//! Tests for qualifier matching and validation

use crate::support::qualifier_type;
use beanwire_application::QualifierMatcher;
use beanwire_application::resolution::{event_qualifiers, validate_qualifiers};
use beanwire_domain::error::Error;
use beanwire_domain::value_objects::{Qualifier, QualifierType};
use std::sync::Arc;

#[test]
fn test_empty_observed_set_matches_anything() {
    let updated = Qualifier::of(&qualifier_type("Updated"));
    assert!(QualifierMatcher::matches(&[], &[updated, Qualifier::any()]));
    assert!(QualifierMatcher::matches(&[], &[Qualifier::any()]));
}

#[test]
fn test_observed_must_be_subset() {
    let updated = Qualifier::of(&qualifier_type("Updated"));
    let by_admin = Qualifier::of(&qualifier_type("ByAdmin"));
    let urgent = Qualifier::of(&qualifier_type("Urgent"));
    let event = [updated.clone(), by_admin.clone(), Qualifier::any()];

    assert!(QualifierMatcher::matches(&[updated.clone(), by_admin], &event));
    assert!(QualifierMatcher::matches(&[Qualifier::any()], &event));
    assert!(!QualifierMatcher::matches(&[updated, urgent], &event));
}

#[test]
fn test_matching_ignores_non_binding_members() {
    let priority = Arc::new(QualifierType::new("Priority").with_non_binding("comment"));
    let observed = Qualifier::of(&priority).with("level", 1_i64).with("comment", "a");
    let fired = Qualifier::of(&priority).with("level", 1_i64).with("comment", "b");
    let other_level = Qualifier::of(&priority).with("level", 2_i64).with("comment", "a");

    assert!(QualifierMatcher::matches(&[observed.clone()], &[fired]));
    assert!(!QualifierMatcher::matches(&[observed], &[other_level]));
}

#[test]
fn test_duplicate_non_repeatable_rejected() {
    let updated = qualifier_type("Updated");
    let result = validate_qualifiers(&[Qualifier::of(&updated), Qualifier::of(&updated)]);
    assert!(matches!(result, Err(Error::DuplicateQualifier { .. })));
}

#[test]
fn test_repeatable_may_repeat() {
    let tag = Arc::new(QualifierType::new("Tag").repeatable());
    let result = validate_qualifiers(&[
        Qualifier::of(&tag).with("value", "a"),
        Qualifier::of(&tag).with("value", "b"),
    ]);
    assert!(result.is_ok());
}

#[test]
fn test_plain_annotation_is_not_a_qualifier() {
    let marker = Arc::new(QualifierType::plain_annotation("Marker"));
    let result = validate_qualifiers(&[Qualifier::of(&marker)]);
    assert!(matches!(result, Err(Error::NotAQualifier { annotation }) if annotation == "Marker"));
}

#[test]
fn test_event_qualifiers_add_default_and_any() {
    let unqualified = event_qualifiers(&[]).unwrap();
    assert!(unqualified.contains(&Qualifier::default_qualifier()));
    assert!(unqualified.contains(&Qualifier::any()));

    let updated = Qualifier::of(&qualifier_type("Updated"));
    let qualified = event_qualifiers(std::slice::from_ref(&updated)).unwrap();
    assert!(qualified.contains(&updated));
    assert!(qualified.contains(&Qualifier::any()));
    assert!(!qualified.contains(&Qualifier::default_qualifier()));
}
