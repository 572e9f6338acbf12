//! Scope lifecycle: activation boundaries and their notifications

pub mod notifications;
pub mod unit_of_work;

pub use notifications::notify_scope;
pub use unit_of_work::{ScopeLifecycle, UnitOfWork};
