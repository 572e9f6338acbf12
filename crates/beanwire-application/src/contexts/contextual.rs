//! Contextual types
//!
//! A [`Contextual`] knows how to create and destroy instances of one bean.
//! [`ContextualType`] pairs it with the bean's metadata and enforces the
//! protocol around it: the pushed instance must be the returned one, and
//! destruction failures never escape.

use super::creational::{CreationalContext, same_instance};
use crate::utils::panic_message;
use beanwire_domain::entities::{BeanMetadata, Payload};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error};

/// A contextual instance
pub type Instance = Payload;

/// Create/destroy protocol of a bean
pub trait Contextual: Send + Sync {
    /// Build a new instance
    ///
    /// May push a partially built instance on `creational` once; if it does,
    /// it must return that same instance.
    fn create(&self, creational: &CreationalContext) -> Result<Instance>;

    /// Tear down an instance and release its creational context
    fn destroy(&self, instance: &Instance, creational: &CreationalContext) -> Result<()> {
        let _ = instance;
        creational.release();
        Ok(())
    }
}

type CreateFn = dyn Fn(&CreationalContext) -> Result<Instance> + Send + Sync;
type DestroyFn = dyn Fn(&Instance) -> Result<()> + Send + Sync;

/// [`Contextual`] built from closures
pub struct FnContextual {
    create: Box<CreateFn>,
    destroy: Option<Box<DestroyFn>>,
}

impl FnContextual {
    /// Contextual whose instances are built by `create`
    pub fn new<F>(create: F) -> Self
    where
        F: Fn(&CreationalContext) -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            create: Box::new(create),
            destroy: None,
        }
    }

    /// Run `destroy` before the creational context is released
    pub fn on_destroy<F>(mut self, destroy: F) -> Self
    where
        F: Fn(&Instance) -> Result<()> + Send + Sync + 'static,
    {
        self.destroy = Some(Box::new(destroy));
        self
    }
}

impl Contextual for FnContextual {
    fn create(&self, creational: &CreationalContext) -> Result<Instance> {
        (self.create)(creational)
    }

    fn destroy(&self, instance: &Instance, creational: &CreationalContext) -> Result<()> {
        let outcome = match &self.destroy {
            Some(destroy) => destroy(instance),
            None => Ok(()),
        };
        creational.release();
        outcome
    }
}

/// A bean: metadata plus its create/destroy protocol
pub struct ContextualType {
    metadata: BeanMetadata,
    lifecycle: Box<dyn Contextual>,
}

impl ContextualType {
    /// Pair `metadata` with `lifecycle`
    pub fn new(metadata: BeanMetadata, lifecycle: impl Contextual + 'static) -> Self {
        Self {
            metadata,
            lifecycle: Box::new(lifecycle),
        }
    }

    /// Bean whose instances `create` builds
    pub fn from_fn<F>(metadata: BeanMetadata, create: F) -> Self
    where
        F: Fn(&CreationalContext) -> Result<Instance> + Send + Sync + 'static,
    {
        Self::new(metadata, FnContextual::new(create))
    }

    /// Bean identity
    pub fn id(&self) -> &BeanId {
        &self.metadata.id
    }

    /// Declared scope
    pub fn scope(&self) -> &ScopeKind {
        &self.metadata.scope
    }

    /// Full metadata
    pub fn metadata(&self) -> &BeanMetadata {
        &self.metadata
    }

    /// Create an instance, checking the push/return contract
    ///
    /// On failure the dependents already recorded in `creational` are
    /// destroyed with it.
    pub fn create_instance(&self, creational: &CreationalContext) -> Result<Instance> {
        let instance = match self.lifecycle.create(creational) {
            Ok(instance) => instance,
            Err(e) => {
                creational.release();
                return Err(e);
            }
        };
        if let Some(pushed) = creational.incomplete_instance() {
            if !same_instance(&pushed, &instance) {
                self.destroy_instance(instance, creational);
                return Err(Error::creation(
                    self.id(),
                    "create returned an instance other than the one it pushed",
                ));
            }
        }
        debug!(bean = %self.id(), scope = %self.scope(), "Created contextual instance");
        Ok(instance)
    }

    /// Destroy an instance; failures and panics are logged, never returned
    ///
    /// The creational context is released even when `destroy` forgot to.
    pub fn destroy_instance(&self, instance: Instance, creational: &CreationalContext) {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.lifecycle.destroy(&instance, creational)
        }));
        match outcome {
            Ok(Ok(())) => {
                debug!(bean = %self.id(), "Destroyed contextual instance");
            }
            Ok(Err(e)) => {
                error!(bean = %self.id(), error = %e, "Failed to destroy contextual instance");
            }
            Err(panic) => {
                error!(
                    bean = %self.id(),
                    panic = %panic_message(panic.as_ref()),
                    "Destroy callback panicked"
                );
            }
        }
        creational.release();
    }
}

impl std::fmt::Debug for ContextualType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextualType")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
