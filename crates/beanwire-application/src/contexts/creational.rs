//! Creational contexts
//!
//! A [`CreationalContext`] accompanies the construction of one contextual
//! instance. It owns the dependent objects created along the way and
//! destroys them, newest first, when released.

use super::contextual::{ContextualType, Instance};
use crate::utils::lock;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::BeanId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

struct DependentInstance {
    contextual: Arc<ContextualType>,
    instance: Instance,
    creational: CreationalContext,
}

struct CreationalInner {
    bean: Option<BeanId>,
    parent: Option<Weak<CreationalInner>>,
    incomplete: Mutex<Option<Instance>>,
    dependents: Mutex<Vec<DependentInstance>>,
    released: AtomicBool,
}

/// Tracks an instance under construction and its dependent objects
#[derive(Clone)]
pub struct CreationalContext {
    inner: Arc<CreationalInner>,
}

impl Default for CreationalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationalContext {
    /// Root context not tied to a bean (e.g. an observer invocation)
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Root context for building `bean`
    pub fn for_bean(bean: BeanId) -> Self {
        Self::build(Some(bean), None)
    }

    /// Context for a dependent object of this one
    pub fn child(&self, bean: &BeanId) -> Self {
        Self::build(Some(bean.clone()), Some(Arc::downgrade(&self.inner)))
    }

    fn build(bean: Option<BeanId>, parent: Option<Weak<CreationalInner>>) -> Self {
        Self {
            inner: Arc::new(CreationalInner {
                bean,
                parent,
                incomplete: Mutex::new(None),
                dependents: Mutex::new(Vec::new()),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Bean built through this context
    pub fn bean(&self) -> Option<&BeanId> {
        self.inner.bean.as_ref()
    }

    /// Register the partially built instance; allowed once
    pub fn push(&self, instance: Instance) -> Result<()> {
        let mut incomplete = lock(&self.inner.incomplete);
        if incomplete.is_some() {
            let bean = self.describe();
            return Err(Error::creation(bean, "push called more than once"));
        }
        *incomplete = Some(instance);
        Ok(())
    }

    /// Instance pushed on this context
    pub fn incomplete_instance(&self) -> Option<Instance> {
        lock(&self.inner.incomplete).clone()
    }

    /// Incomplete instance of `bean` pushed on this context or an ancestor
    pub fn incomplete_instance_of(&self, bean: &BeanId) -> Option<Instance> {
        let mut current = Some(self.inner.clone());
        while let Some(node) = current {
            if node.bean.as_ref() == Some(bean) {
                if let Some(instance) = lock(&node.incomplete).clone() {
                    return Some(instance);
                }
            }
            current = node.parent.as_ref().and_then(Weak::upgrade);
        }
        None
    }

    /// Record a dependent object to destroy on release
    pub fn add_dependent(
        &self,
        contextual: Arc<ContextualType>,
        instance: Instance,
        creational: CreationalContext,
    ) {
        lock(&self.inner.dependents).push(DependentInstance {
            contextual,
            instance,
            creational,
        });
    }

    /// Number of dependent objects recorded and not yet destroyed
    pub fn dependent_count(&self) -> usize {
        lock(&self.inner.dependents).len()
    }

    /// Destroy one dependent object ahead of release
    ///
    /// Returns false when `instance` is not a dependent of this context.
    pub fn destroy_dependent(&self, instance: &Instance) -> bool {
        let found = {
            let mut dependents = lock(&self.inner.dependents);
            dependents
                .iter()
                .position(|d| same_instance(&d.instance, instance))
                .map(|index| dependents.remove(index))
        };
        match found {
            Some(dependent) => {
                dependent
                    .contextual
                    .destroy_instance(dependent.instance, &dependent.creational);
                true
            }
            None => false,
        }
    }

    /// Destroy every dependent object, newest first
    ///
    /// Only the first call has an effect.
    pub fn release(&self) {
        if self.inner.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let dependents = std::mem::take(&mut *lock(&self.inner.dependents));
        for dependent in dependents.into_iter().rev() {
            dependent
                .contextual
                .destroy_instance(dependent.instance, &dependent.creational);
        }
        lock(&self.inner.incomplete).take();
    }

    /// True once [`release`](Self::release) ran
    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    fn describe(&self) -> String {
        self.bean()
            .map_or_else(|| "<unnamed>".to_string(), ToString::to_string)
    }
}

impl std::fmt::Debug for CreationalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreationalContext")
            .field("bean", &self.inner.bean)
            .field("dependents", &self.dependent_count())
            .field("released", &self.is_released())
            .finish()
    }
}

/// Identity comparison of two instances, ignoring vtable metadata
pub fn same_instance(a: &Instance, b: &Instance) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
