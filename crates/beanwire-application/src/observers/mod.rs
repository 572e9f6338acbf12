//! Observer methods and their registry

pub mod method;
pub mod registry;

pub use method::{ObserverFailure, ObserverInvocation, ObserverMethod, ObserverResult};
pub use registry::ObserverRegistry;
