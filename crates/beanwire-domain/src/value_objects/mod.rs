//! Domain Value Objects
//!
//! Immutable values compared by their attributes.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Qualifier`] | qualifier instance, equality ignores non-binding members |
//! | [`TypeDescriptor`] | raw, parameterized, wildcard or variable type |
//! | [`ScopeKind`] | lifecycle/sharing policy |
//! | [`BeanId`] / [`ObserverId`] | identities |
//! | [`ConversationState`] | transient or long-running |

/// Conversation state and signals
pub mod conversation;
/// Bean and observer identities
pub mod identity;
/// Qualifier types and instances
pub mod qualifier;
/// Scope kinds
pub mod scope;
/// Type descriptors
pub mod types;

pub use conversation::{ConversationSignal, ConversationState};
pub use identity::{BeanId, ObserverId};
pub use qualifier::{MemberValue, Qualifier, QualifierType};
pub use scope::ScopeKind;
pub use types::{ClassId, TypeDescriptor};
