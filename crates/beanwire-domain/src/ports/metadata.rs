//! Bean Metadata Port
//!
//! Answers questions about a contextual type by identity: declared scope,
//! injection points, enablement.

use crate::entities::BeanMetadata;
use crate::value_objects::BeanId;
use std::sync::Arc;

/// Source of bean metadata
pub trait BeanMetadataProvider: Send + Sync {
    /// Metadata of the bean, if it is known
    fn bean_metadata(&self, id: &BeanId) -> Option<BeanMetadata>;

    /// True when the bean is known and enabled
    fn is_enabled(&self, id: &BeanId) -> bool {
        self.bean_metadata(id).is_some_and(|metadata| metadata.enabled)
    }

    /// Changes whenever earlier answers may no longer hold
    fn revision(&self) -> u64 {
        0
    }
}

/// Shared metadata provider for dependency injection
pub type SharedBeanMetadataProvider = Arc<dyn BeanMetadataProvider>;
