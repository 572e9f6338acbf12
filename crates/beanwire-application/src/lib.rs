//! Application layer for beanwire
//!
//! The two engines of the container:
//!
//! - the event bus: [`resolution`], [`observers`], [`events`]
//! - the context/scope manager: [`contexts`], [`conversation`],
//!   [`lifecycle`], [`validation`]
//!
//! Collaborators (transactions, serialization, bean metadata) are reached
//! through the ports of `beanwire-domain`.

pub mod beans;
pub mod contexts;
pub mod conversation;
pub mod events;
pub mod lifecycle;
pub mod observers;
pub mod resolution;
pub mod validation;

mod utils;

pub use beans::BeanRegistry;
pub use contexts::{
    Context, ContextManager, Contextual, ContextualReference, ContextualType, CreationalContext,
    FnContextual, Instance,
};
pub use conversation::{
    Conversation, ConversationAssociation, ConversationManager, ConversationSettings, Session,
};
pub use events::{AmbientState, EventDispatcher, EventHandle};
pub use lifecycle::{ScopeLifecycle, UnitOfWork};
pub use observers::{ObserverFailure, ObserverInvocation, ObserverMethod, ObserverRegistry};
pub use resolution::{QualifierMatcher, TypeAssignability};
pub use validation::{DefinitionValidator, PassivationValidator};
