//! The process-wide application context

use super::context::Context;
use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use super::store::ContextStore;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared by every thread between container start and shutdown
#[derive(Debug)]
pub struct ApplicationContext {
    scope: ScopeKind,
    store: Arc<ContextStore>,
    active: AtomicBool,
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationContext {
    /// Inactive application context with an empty store
    pub fn new() -> Self {
        Self {
            scope: ScopeKind::Application,
            store: Arc::new(ContextStore::new(ScopeKind::Application)),
            active: AtomicBool::new(false),
        }
    }

    /// Activate; returns false when already active
    pub fn activate(&self) -> bool {
        !self.active.swap(true, Ordering::SeqCst)
    }

    /// Deactivate and destroy every application instance
    pub fn deactivate(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.store.destroy_all();
        }
    }

    /// Shared store
    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    fn require(&self) -> Result<&ContextStore> {
        if self.is_active() {
            Ok(&self.store)
        } else {
            Err(Error::context_not_active(&self.scope))
        }
    }
}

impl Context for ApplicationContext {
    fn scope(&self) -> &ScopeKind {
        &self.scope
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn get(
        &self,
        contextual: &Arc<ContextualType>,
        creational: Option<&CreationalContext>,
    ) -> Result<Option<Instance>> {
        self.require()?.get(contextual, creational)
    }

    fn destroy(&self, bean: &BeanId) -> Result<()> {
        self.require()?.destroy(bean);
        Ok(())
    }
}
