//! Type and qualifier resolution used by observer matching

pub mod assignability;
pub mod qualifiers;

pub use assignability::TypeAssignability;
pub use qualifiers::{QualifierMatcher, event_qualifiers, validate_qualifiers};
