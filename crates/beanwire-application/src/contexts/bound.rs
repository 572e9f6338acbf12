//! Thread-bound contexts
//!
//! Request, session and conversation contexts are active on a thread while
//! a store is bound to it. Each thread sees only its own binding; two
//! threads may share a store (same session) without sharing activation.

use super::context::Context;
use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use super::store::ContextStore;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use dashmap::DashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Context whose active store is bound per thread
#[derive(Debug)]
pub struct BoundContext {
    scope: ScopeKind,
    bindings: DashMap<ThreadId, Arc<ContextStore>>,
}

impl BoundContext {
    /// Inactive context for `scope`
    pub fn new(scope: ScopeKind) -> Self {
        Self {
            scope,
            bindings: DashMap::new(),
        }
    }

    /// Activate on this thread with `store`, returning any displaced store
    pub fn bind(&self, store: Arc<ContextStore>) -> Option<Arc<ContextStore>> {
        self.bindings.insert(thread::current().id(), store)
    }

    /// Deactivate on this thread, returning the store that was bound
    pub fn unbind(&self) -> Option<Arc<ContextStore>> {
        self.bindings
            .remove(&thread::current().id())
            .map(|(_, store)| store)
    }

    /// Store bound to this thread
    pub fn current(&self) -> Option<Arc<ContextStore>> {
        self.bindings
            .get(&thread::current().id())
            .map(|store| store.clone())
    }

    fn require(&self) -> Result<Arc<ContextStore>> {
        self.current()
            .ok_or_else(|| Error::context_not_active(&self.scope))
    }
}

impl Context for BoundContext {
    fn scope(&self) -> &ScopeKind {
        &self.scope
    }

    fn is_active(&self) -> bool {
        self.bindings.contains_key(&thread::current().id())
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
