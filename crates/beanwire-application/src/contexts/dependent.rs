//! The `Dependent` pseudo-scope

use super::context::Context;
use super::contextual::{ContextualType, Instance};
use super::creational::CreationalContext;
use beanwire_domain::error::Result;
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::sync::Arc;

/// Always active; every `get` with a creational context builds a new
/// instance owned by that context
#[derive(Debug, Default)]
pub struct DependentContext {
    scope: ScopeKind,
}

impl DependentContext {
    /// The dependent pseudo-scope
    pub fn new() -> Self {
        Self {
            scope: ScopeKind::Dependent,
        }
    }
}

impl Context for DependentContext {
    fn scope(&self) -> &ScopeKind {
        &self.scope
    }

    fn is_active(&self) -> bool {
        true
    }

    fn get(
        &self,
        contextual: &Arc<ContextualType>,
        creational: Option<&CreationalContext>,
    ) -> Result<Option<Instance>> {
        let Some(parent) = creational else {
            return Ok(None);
        };
        let child = parent.child(contextual.id());
        let instance = contextual.create_instance(&child)?;
        parent.add_dependent(contextual.clone(), instance.clone(), child);
        Ok(Some(instance))
    }

    fn destroy(&self, _bean: &BeanId) -> Result<()> {
        Ok(())
    }
}
