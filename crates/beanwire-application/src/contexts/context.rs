//! The per-scope context contract

use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use beanwire_domain::error::Result;
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::sync::Arc;

/// Maps contextual types to their current instances within one scope
pub trait Context: Send + Sync {
    /// Scope served by this context
    fn scope(&self) -> &ScopeKind;

    /// Whether the context is active for the calling thread
    fn is_active(&self) -> bool;

    /// Current instance of `contextual`
    ///
    /// With a creational context a missing instance is created; without one
    /// `Ok(None)` is returned instead.
    fn get(
        &self,
        contextual: &Arc<ContextualType>,
        creational: Option<&CreationalContext>,
    ) -> Result<Option<Instance>>;

    /// Remove and destroy the current instance of `bean`
    fn destroy(&self, bean: &BeanId) -> Result<()>;
}
