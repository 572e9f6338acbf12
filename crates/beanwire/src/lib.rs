//! # beanwire
//!
//! Contextual instances, scoped contexts and typed, qualified event dispatch
//! for a dependency-injection container.
//!
//! This crate is the public facade. It re-exports the three layers and a
//! [`prelude`] with the types most programs need.
//!
//! ## Example
//!
//! ```ignore
//! use beanwire::prelude::*;
//!
//! let updated = Arc::new(QualifierType::new("Updated"));
//! let container = ContainerBuilder::new(ConfigLoader::new().load()?)
//!     .observer(ObserverMethod::new(
//!         ObserverDescriptor::new("Audit", "onUpdate", TypeDescriptor::class("Document"))
//!             .with_qualifiers([Qualifier::of(&updated)]),
//!         |invocation| {
//!             let document = invocation.event::<Document>();
//!             Ok(())
//!         },
//!     ))
//!     .build()?;
//!
//! container
//!     .event_handle(TypeDescriptor::class("Document"))
//!     .select([Qualifier::of(&updated)])?
//!     .fire(document)?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value objects, entities, ports and the error type
//! - `application` - the event bus and the context/scope manager
//! - `infrastructure` - configuration, logging, default collaborators and
//!   the [`Container`] composition root

/// Domain layer - value objects, entities and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use beanwire_domain::*;
}

/// Application layer - event dispatch, contexts and conversations
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use beanwire_application::*;
}

/// Infrastructure layer - configuration, logging and the container
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use beanwire_infrastructure::*;
}

/// Types most programs need
pub mod prelude {
    pub use beanwire_application::{
        ContextualReference, ContextualType, Conversation, CreationalContext, EventHandle,
        FnContextual, Instance, ObserverFailure, ObserverInvocation, ObserverMethod, Session,
        UnitOfWork,
    };
    pub use beanwire_domain::entities::{
        BeanKind, BeanMetadata, ClassInfo, FiredEvent, InjectionPoint, ObserverDescriptor,
        Reception, TransactionPhase, TypeHierarchy,
    };
    pub use beanwire_domain::events::{ContainerLifecycleEvent, ScopeBoundary};
    pub use beanwire_domain::ports::{TransactionOutcome, TransactionServices};
    pub use beanwire_domain::value_objects::{
        BeanId, ConversationSignal, Qualifier, QualifierType, ScopeKind, TypeDescriptor,
    };
    pub use beanwire_domain::{Error, Result};
    pub use beanwire_infrastructure::infrastructure::{
        LocalTransactionManager, SerdeSerializationFacility,
    };
    pub use beanwire_infrastructure::{AppConfig, ConfigLoader, Container, ContainerBuilder};
    pub use std::sync::Arc;
}

// Re-export the error type and the container at the crate root
pub use beanwire_domain::{Error, Result};
pub use beanwire_infrastructure::{AppConfig, ConfigLoader, Container, ContainerBuilder};
