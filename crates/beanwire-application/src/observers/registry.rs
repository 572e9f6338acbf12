//! Observer registry
//!
//! Resolution runs a filter chain over every registered observer:
//!
//! 1. the declaring bean is enabled
//! 2. some type in the event's closure is assignable to the observed type
//! 3. the observed qualifiers are a subset of the event's
//! 4. container lifecycle events reach extensions only
//!
//! Results are cached per (event type, qualifiers, lifecycle flag) until the
//! next observer registration or a change of bean metadata. Callers must not rely on the order of results.

use super::method::ObserverMethod;
use crate::resolution::{QualifierMatcher, TypeAssignability};
use crate::utils::{read, write};
use beanwire_domain::ports::SharedBeanMetadataProvider;
use beanwire_domain::value_objects::{BeanId, Qualifier, TypeDescriptor};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolutionKey {
    event_type: TypeDescriptor,
    qualifiers: Vec<Qualifier>,
    lifecycle: bool,
}

/// Every observer of the deployment
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<ObserverMethod>>>,
    assignability: TypeAssignability,
    metadata: SharedBeanMetadataProvider,
    cache: Option<DashMap<ResolutionKey, Arc<[Arc<ObserverMethod>]>>>,
    cached_revision: AtomicU64,
}

impl ObserverRegistry {
    /// Registry resolving with `assignability` and the bean metadata in `metadata`
    pub fn new(assignability: TypeAssignability, metadata: SharedBeanMetadataProvider) -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            assignability,
            metadata,
            cache: Some(DashMap::new()),
            cached_revision: AtomicU64::new(0),
        }
    }

    /// Turn the resolution cache on or off
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    /// Assignability rules in use
    pub fn assignability(&self) -> &TypeAssignability {
        &self.assignability
    }

    /// Add an observer
    pub fn register(&self, observer: ObserverMethod) -> Arc<ObserverMethod> {
        let observer = Arc::new(observer);
        debug!(
            observer = %observer.id(),
            observed_type = %observer.descriptor().observed_type,
            "Registered observer"
        );
        write(&self.observers).push(observer.clone());
        self.clear_cache();
        observer
    }

    /// Drop cached resolutions
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Every observer, in registration order
    pub fn all(&self) -> Vec<Arc<ObserverMethod>> {
        read(&self.observers).clone()
    }

    /// Number of observers
    pub fn len(&self) -> usize {
        read(&self.observers).len()
    }

    /// True when no observer is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observers declared by `bean`
    pub fn observers_for_bean(&self, bean: &BeanId) -> Vec<Arc<ObserverMethod>> {
        read(&self.observers)
            .iter()
            .filter(|o| o.descriptor().bean() == bean)
            .cloned()
            .collect()
    }

    /// Observers of an event of `event_type` carrying `qualifiers`
    ///
    /// `qualifiers` is the event's full set, `@Any` included.
    pub fn resolve(
        &self,
        event_type: &TypeDescriptor,
        qualifiers: &[Qualifier],
        lifecycle: bool,
    ) -> Arc<[Arc<ObserverMethod>]> {
        let Some(cache) = &self.cache else {
            return self.compute(event_type, qualifiers, lifecycle);
        };
        let revision = self.metadata.revision();
        if self.cached_revision.swap(revision, Ordering::SeqCst) != revision {
            cache.clear();
        }
        let key = ResolutionKey {
            event_type: event_type.clone(),
            qualifiers: qualifiers.to_vec(),
            lifecycle,
        };
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
        let resolved = self.compute(event_type, qualifiers, lifecycle);
        cache.insert(key, resolved.clone());
        resolved
    }

    fn compute(
        &self,
        event_type: &TypeDescriptor,
        qualifiers: &[Qualifier],
        lifecycle: bool,
    ) -> Arc<[Arc<ObserverMethod>]> {
        let closure = self.assignability.type_closure(event_type);
        let resolved: Vec<Arc<ObserverMethod>> = read(&self.observers)
            .iter()
            .filter(|o| self.is_enabled(o.descriptor().bean()))
            .filter(|o| {
                self.assignability
                    .observes(&closure, &o.descriptor().observed_type)
            })
            .filter(|o| QualifierMatcher::matches(&o.descriptor().qualifiers, qualifiers))
            .filter(|o| !lifecycle || o.descriptor().extension)
            .cloned()
            .collect();
        debug!(
            event_type = %event_type,
            matched = resolved.len(),
            lifecycle,
            "Resolved observers"
        );
        Arc::from(resolved)
    }

    /// Unknown owners are synthetic observers and always enabled
    fn is_enabled(&self, bean: &BeanId) -> bool {
        self.metadata
            .bean_metadata(bean)
            .is_none_or(|metadata| metadata.enabled)
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .field("cached", &self.cache.as_ref().map(DashMap::len))
            .finish()
    }
}
