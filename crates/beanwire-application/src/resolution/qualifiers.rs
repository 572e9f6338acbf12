//! Qualifier matching and validation

use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::Qualifier;
use std::collections::HashSet;

/// Subset test between observed and event qualifiers
pub struct QualifierMatcher;

impl QualifierMatcher {
    /// True iff every observed qualifier is among the event's qualifiers
    ///
    /// `@Any` is carried by every event, so an observed `@Any` always matches
    /// and an empty observed set matches everything.
    pub fn matches(observed: &[Qualifier], event: &[Qualifier]) -> bool {
        observed.iter().all(|q| q.is_any() || event.contains(q))
    }
}

/// Reject annotations that are not qualifiers and repeated non-repeatable kinds
pub fn validate_qualifiers(qualifiers: &[Qualifier]) -> Result<()> {
    let mut kinds = HashSet::new();
    for qualifier in qualifiers {
        let ty = qualifier.qualifier_type();
        if !ty.is_qualifier() {
            return Err(Error::not_a_qualifier(ty.name()));
        }
        if !kinds.insert(qualifier.kind()) && !ty.is_repeatable() {
            return Err(Error::duplicate_qualifier(qualifier.to_string()));
        }
    }
    Ok(())
}

/// Full qualifier set of a fired event
///
/// Validates the given qualifiers, adds `@Default` when none were given and
/// always adds `@Any`.
pub fn event_qualifiers(given: &[Qualifier]) -> Result<Vec<Qualifier>> {
    validate_qualifiers(given)?;
    let mut qualifiers: Vec<Qualifier> = given.iter().filter(|q| !q.is_any()).cloned().collect();
    if qualifiers.is_empty() {
        qualifiers.push(Qualifier::default_qualifier());
    }
    qualifiers.push(Qualifier::any());
    Ok(qualifiers)
}
