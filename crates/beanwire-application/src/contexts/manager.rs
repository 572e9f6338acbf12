//! Context lookup per scope
//!
//! The [`ContextManager`] owns the built-in contexts, accepts custom ones,
//! and answers "which context of scope S is active right now?". It is the
//! single entry point the dispatcher and references use to reach instances.

use super::application::ApplicationContext;
use super::bound::BoundContext;
use super::context::Context;
use super::contextual::Instance;
use super::creational::CreationalContext;
use super::dependent::DependentContext;
use super::reference::ContextualReference;
use super::store::ContextStore;
use crate::beans::BeanRegistry;
use crate::utils::{read, write};
use crate::validation::PassivationValidator;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Registry of contexts by scope
pub struct ContextManager {
    beans: Arc<BeanRegistry>,
    dependent: Arc<DependentContext>,
    request: Arc<BoundContext>,
    session: Arc<BoundContext>,
    conversation: Arc<BoundContext>,
    application: Arc<ApplicationContext>,
    custom: RwLock<HashMap<ScopeKind, Vec<Arc<dyn Context>>>>,
    validator: Option<Arc<PassivationValidator>>,
}

impl ContextManager {
    /// Built-in contexts over `beans`; passivating stores use `validator`
    pub fn new(beans: Arc<BeanRegistry>, validator: Option<Arc<PassivationValidator>>) -> Self {
        Self {
            beans,
            dependent: Arc::new(DependentContext::new()),
            request: Arc::new(BoundContext::new(ScopeKind::Request)),
            session: Arc::new(BoundContext::new(ScopeKind::Session)),
            conversation: Arc::new(BoundContext::new(ScopeKind::Conversation)),
            application: Arc::new(ApplicationContext::new()),
            custom: RwLock::new(HashMap::new()),
            validator,
        }
    }

    /// Register a context for a custom scope
    ///
    /// Several contexts may serve one scope as long as at most one of them
    /// is active at any time.
    pub fn add_context(&self, context: Arc<dyn Context>) {
        debug!(scope = %context.scope(), "Registered custom context");
        write(&self.custom)
            .entry(context.scope().clone())
            .or_default()
            .push(context);
    }

    /// Beans known to the container
    pub fn beans(&self) -> &Arc<BeanRegistry> {
        &self.beans
    }

    /// Request context
    pub fn request(&self) -> &Arc<BoundContext> {
        &self.request
    }

    /// Session context
    pub fn session(&self) -> &Arc<BoundContext> {
        &self.session
    }

    /// Conversation context
    pub fn conversation(&self) -> &Arc<BoundContext> {
        &self.conversation
    }

    /// Application context
    pub fn application(&self) -> &Arc<ApplicationContext> {
        &self.application
    }

    /// New store for `scope`, validated when the scope passivates
    pub fn new_store(&self, scope: ScopeKind) -> Arc<ContextStore> {
        let store = ContextStore::new(scope);
        match &self.validator {
            Some(validator) if store.scope().is_passivating() => {
                Arc::new(store.with_validator(validator.clone()))
            }
            _ => Arc::new(store),
        }
    }

    /// The single active context of `scope`
    pub fn active_context(&self, scope: &ScopeKind) -> Result<Arc<dyn Context>> {
        let candidates = self.contexts_for(scope);
        let mut active = candidates.into_iter().filter(|c| c.is_active());
        let Some(first) = active.next() else {
            return Err(Error::context_not_active(scope));
        };
        let extra = active.count();
        if extra > 0 {
            return Err(Error::ambiguous_active_context(scope, extra + 1));
        }
        Ok(first)
    }

    /// Whether some context of `scope` is active on this thread
    pub fn is_active(&self, scope: &ScopeKind) -> bool {
        self.contexts_for(scope).iter().any(|c| c.is_active())
    }

    fn contexts_for(&self, scope: &ScopeKind) -> Vec<Arc<dyn Context>> {
        let mut contexts: Vec<Arc<dyn Context>> = match scope {
            ScopeKind::Dependent => vec![self.dependent.clone()],
            ScopeKind::Request => vec![self.request.clone()],
            ScopeKind::Session => vec![self.session.clone()],
            ScopeKind::Conversation => vec![self.conversation.clone()],
            ScopeKind::Application => vec![self.application.clone()],
            ScopeKind::Custom { .. } => Vec::new(),
        };
        if let Some(custom) = read(&self.custom).get(scope) {
            contexts.extend(custom.iter().cloned());
        }
        contexts
    }

    /// Instance of `bean` for injection while building with `creational`
    ///
    /// Dependent instances become dependents of `creational`; normal-scoped
    /// ones are owned by their context. An incomplete instance of `bean`
    /// pushed further up the creational chain satisfies a cycle.
    pub fn get_instance(&self, bean: &BeanId, creational: &CreationalContext) -> Result<Instance> {
        let contextual = self.beans.require(bean)?;
        if let Some(incomplete) = creational.incomplete_instance_of(bean) {
            return Ok(incomplete);
        }
        let context = self.active_context(contextual.scope())?;
        let instance = if contextual.scope().is_normal() {
            context.get(&contextual, Some(&CreationalContext::for_bean(bean.clone())))?
        } else {
            context.get(&contextual, Some(creational))?
        };
        instance.ok_or_else(|| Error::internal(format!("context returned no instance for {bean}")))
    }

    /// Existing instance of `bean` in its active context, never creating one
    pub fn get_existing(&self, bean: &BeanId) -> Result<Option<Instance>> {
        let contextual = self.beans.require(bean)?;
        self.active_context(contextual.scope())?
            .get(&contextual, None)
    }

    /// Remove and destroy the current instance of `bean`
    pub fn destroy(&self, bean: &BeanId) -> Result<()> {
        let contextual = self.beans.require(bean)?;
        self.active_context(contextual.scope())?
            .destroy(bean)
    }

    /// Client handle on the current instance of a normal-scoped bean
    pub fn reference(self: &Arc<Self>, bean: &BeanId) -> Result<ContextualReference> {
        let contextual = self.beans.require(bean)?;
        if !contextual.scope().is_normal() {
            return Err(Error::internal(format!(
                "{bean} has scope {} and no contextual reference",
                contextual.scope()
            )));
        }
        Ok(ContextualReference::new(contextual, self.clone()))
    }
}
