//! Container and scope lifecycle events

pub mod lifecycle;

pub use lifecycle::{ContainerLifecycleEvent, SCOPE_BOUNDARY_CLASS, ScopeBoundary};
