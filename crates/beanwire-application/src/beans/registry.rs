//! Bean registry
//!
//! Holds every contextual type of the deployment and answers metadata
//! queries for the rest of the container.

use crate::contexts::ContextualType;
use beanwire_domain::entities::BeanMetadata;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::ports::BeanMetadataProvider;
use beanwire_domain::value_objects::BeanId;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Contextual types by identity
#[derive(Debug, Default)]
pub struct BeanRegistry {
    beans: DashMap<BeanId, Arc<ContextualType>>,
    revision: AtomicU64,
}

impl BeanRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bean, replacing one with the same identity
    pub fn register(&self, contextual: ContextualType) -> Arc<ContextualType> {
        let contextual = Arc::new(contextual);
        self.beans
            .insert(contextual.id().clone(), contextual.clone());
        self.revision.fetch_add(1, Ordering::SeqCst);
        contextual
    }

    /// Bean by identity
    pub fn get(&self, bean: &BeanId) -> Option<Arc<ContextualType>> {
        self.beans.get(bean).map(|b| b.clone())
    }

    /// Bean by identity, failing when unknown
    pub fn require(&self, bean: &BeanId) -> Result<Arc<ContextualType>> {
        self.get(bean).ok_or_else(|| Error::unknown_bean(bean))
    }

    /// Every bean
    pub fn all(&self) -> Vec<Arc<ContextualType>> {
        self.beans.iter().map(|b| b.value().clone()).collect()
    }

    /// Number of beans
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl BeanMetadataProvider for BeanRegistry {
    fn bean_metadata(&self, bean: &BeanId) -> Option<BeanMetadata> {
        self.beans.get(bean).map(|b| b.metadata().clone())
    }

    fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}
