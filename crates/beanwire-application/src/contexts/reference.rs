//! Contextual references
//!
//! A [`ContextualReference`] stands in for a client proxy: it never holds
//! an instance, and every access resolves the instance current in the
//! calling thread's active context.

use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use super::manager::ContextManager;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::BeanId;
use std::any::Any;
use std::sync::Arc;

/// Handle resolving "the current instance of bean X"
#[derive(Clone)]
pub struct ContextualReference {
    contextual: Arc<ContextualType>,
    contexts: Arc<ContextManager>,
}

impl ContextualReference {
    pub(crate) fn new(contextual: Arc<ContextualType>, contexts: Arc<ContextManager>) -> Self {
        Self {
            contextual,
            contexts,
        }
    }

    /// Bean the reference points at
    pub fn bean(&self) -> &BeanId {
        self.contextual.id()
    }

    /// Current instance, created on first access within the active context
    pub fn get(&self) -> Result<Instance> {
        let context = self.contexts.active_context(self.contextual.scope())?;
        let creational = CreationalContext::for_bean(self.bean().clone());
        context
            .get(&self.contextual, Some(&creational))?
            .ok_or_else(|| Error::internal(format!("context returned no instance for {}", self.bean())))
    }

    /// Current instance downcast to `T`
    pub fn get_as<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.get()?.downcast::<T>().map_err(|_| {
            Error::internal(format!(
                "instance of {} is not a {}",
                self.bean(),
                std::any::type_name::<T>()
            ))
        })
    }
}

impl std::fmt::Debug for ContextualReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextualReference")
            .field("bean", self.bean())
            .finish()
    }
}
