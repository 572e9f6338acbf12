//! Container and scope lifecycle events
//!
//! Container lifecycle events are fired by the container itself and only
//! reach extension observers. Applications may not fire any event whose
//! type is assignable to one of them.
//!
//! Scope lifecycle notifications are ordinary events whose payload is a
//! [`ScopeBoundary`] and whose qualifier (`@Initialized`, `@BeforeDestroyed`,
//! `@Destroyed`) carries the scope.

use crate::value_objects::{ClassId, ScopeKind, TypeDescriptor};
use serde::{Deserialize, Serialize};

/// Class name of the scope lifecycle payload
pub const SCOPE_BOUNDARY_CLASS: &str = "ScopeBoundary";

/// Event types reserved for the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerLifecycleEvent {
    /// Before bean discovery starts
    BeforeBeanDiscovery,
    /// Per discovered type
    ProcessAnnotatedType,
    /// Per discovered observer method
    ProcessObserverMethod,
    /// After all beans are discovered
    AfterBeanDiscovery,
    /// After deployment validation succeeded
    AfterDeploymentValidation,
    /// Before the container shuts down
    BeforeShutdown,
}

impl ContainerLifecycleEvent {
    /// Every reserved type
    pub const ALL: [ContainerLifecycleEvent; 6] = [
        ContainerLifecycleEvent::BeforeBeanDiscovery,
        ContainerLifecycleEvent::ProcessAnnotatedType,
        ContainerLifecycleEvent::ProcessObserverMethod,
        ContainerLifecycleEvent::AfterBeanDiscovery,
        ContainerLifecycleEvent::AfterDeploymentValidation,
        ContainerLifecycleEvent::BeforeShutdown,
    ];

    /// Class name of the reserved type
    pub fn class_name(self) -> &'static str {
        match self {
            ContainerLifecycleEvent::BeforeBeanDiscovery => "BeforeBeanDiscovery",
            ContainerLifecycleEvent::ProcessAnnotatedType => "ProcessAnnotatedType",
            ContainerLifecycleEvent::ProcessObserverMethod => "ProcessObserverMethod",
            ContainerLifecycleEvent::AfterBeanDiscovery => "AfterBeanDiscovery",
            ContainerLifecycleEvent::AfterDeploymentValidation => "AfterDeploymentValidation",
            ContainerLifecycleEvent::BeforeShutdown => "BeforeShutdown",
        }
    }

    /// Class identity of the reserved type
    pub fn class_id(self) -> ClassId {
        ClassId::new(self.class_name())
    }

    /// Type descriptor of the reserved type
    pub fn type_descriptor(self) -> TypeDescriptor {
        TypeDescriptor::Class(self.class_id())
    }
}

/// Payload of scope lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBoundary {
    /// Scope being activated or torn down
    pub scope: ScopeKind,
    /// Identifier of the unit (request id, session id, conversation id)
    pub unit: Option<String>,
}

impl ScopeBoundary {
    /// Describe a boundary of `scope`
    pub fn new(scope: ScopeKind, unit: Option<String>) -> Self {
        Self { scope, unit }
    }

    /// Type descriptor of the payload
    pub fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::class(SCOPE_BOUNDARY_CLASS)
    }
}
