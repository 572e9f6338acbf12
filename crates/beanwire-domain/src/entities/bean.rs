//! Bean metadata
//!
//! What the container knows about a contextual type without touching its
//! instances: scope, injection points, enablement, kind and the optional
//! passivation capability. Capabilities are plain fields rather than a
//! chain of marker traits.

use crate::value_objects::{BeanId, Qualifier, ScopeKind, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role a bean plays in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BeanKind {
    /// Ordinary managed bean
    #[default]
    Managed,
    /// Portable extension; the only receivers of container lifecycle events
    Extension,
    /// Interceptor; may not declare observers
    Interceptor,
    /// Decorator; may not declare observers
    Decorator,
}

/// A declared dependency of a bean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    /// Bean declaring the injection point
    pub declaring_bean: BeanId,
    /// Required type
    pub required_type: TypeDescriptor,
    /// Required qualifiers
    pub qualifiers: Vec<Qualifier>,
    /// Bean the injection point resolved to, if resolution happened
    pub target: Option<BeanId>,
    /// Marked as a transient reference (not retained, not passivated)
    pub transient: bool,
}

impl InjectionPoint {
    /// Describe an injection point of `required_type` on `declaring_bean`
    pub fn new(declaring_bean: impl Into<BeanId>, required_type: TypeDescriptor) -> Self {
        Self {
            declaring_bean: declaring_bean.into(),
            required_type,
            qualifiers: Vec::new(),
            target: None,
            transient: false,
        }
    }

    /// Set the required qualifiers
    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        self.qualifiers = qualifiers.into_iter().collect();
        self
    }

    /// Record the bean the injection point resolved to
    pub fn resolved_to(mut self, target: impl Into<BeanId>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Mark as a transient reference
    pub fn transient_reference(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// Metadata of a contextual type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanMetadata {
    /// Identity
    pub id: BeanId,
    /// Declared scope
    pub scope: ScopeKind,
    /// Bean kind
    pub kind: BeanKind,
    /// Injection points
    pub injection_points: Vec<InjectionPoint>,
    /// Whether the bean is enabled in this deployment
    pub enabled: bool,
    /// Present when the bean is passivation capable
    pub passivation_id: Option<Arc<str>>,
}

impl BeanMetadata {
    /// Metadata for an enabled managed bean
    pub fn new(id: impl Into<BeanId>, scope: ScopeKind) -> Self {
        Self {
            id: id.into(),
            scope,
            kind: BeanKind::Managed,
            injection_points: Vec::new(),
            enabled: true,
            passivation_id: None,
        }
    }

    /// Set the bean kind
    pub fn with_kind(mut self, kind: BeanKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add an injection point
    pub fn with_injection_point(mut self, injection_point: InjectionPoint) -> Self {
        self.injection_points.push(injection_point);
        self
    }

    /// Make the bean passivation capable
    pub fn passivation_capable(mut self, passivation_id: impl Into<Arc<str>>) -> Self {
        self.passivation_id = Some(passivation_id.into());
        self
    }

    /// Disable the bean
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// True when the bean may be passivated
    pub fn is_passivation_capable(&self) -> bool {
        self.passivation_id.is_some()
    }
}
