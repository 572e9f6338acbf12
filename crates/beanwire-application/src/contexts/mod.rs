//! Contexts and contextual instances
//!
//! ```text
//! ContextManager ──► Context (per scope) ──► ContextStore ──► instance + CreationalContext
//!                      │                                           └─► dependents
//!                      ├─ DependentContext   always active, never caches
//!                      ├─ BoundContext       request / session / conversation, per thread
//!                      └─ ApplicationContext shared by every thread
//! ```

pub mod application;
pub mod bound;
pub mod context;
pub mod contextual;
pub mod creational;
pub mod dependent;
pub mod manager;
pub mod reference;
pub mod store;

pub use application::ApplicationContext;
pub use bound::BoundContext;
pub use context::Context;
pub use contextual::{Contextual, ContextualType, FnContextual, Instance};
pub use creational::{CreationalContext, same_instance};
pub use dependent::DependentContext;
pub use manager::ContextManager;
pub use reference::ContextualReference;
pub use store::ContextStore;
