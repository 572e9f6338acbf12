//! Fired events
//!
//! A [`FiredEvent`] is created per `fire` call and consumed synchronously.
//! It has no identity of its own.

use super::bean::InjectionPoint;
use crate::value_objects::{Qualifier, TypeDescriptor};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased event payload
pub type Payload = Arc<dyn Any + Send + Sync>;

/// An event object plus the information needed to resolve its observers
#[derive(Clone)]
pub struct FiredEvent {
    payload: Payload,
    payload_type: TypeDescriptor,
    qualifiers: Vec<Qualifier>,
    injection_point: Option<InjectionPoint>,
    type_hint: Option<TypeDescriptor>,
}

impl FiredEvent {
    /// Wrap `value`, whose runtime type is `payload_type`
    pub fn new<T: Any + Send + Sync>(value: T, payload_type: TypeDescriptor) -> Self {
        Self::from_payload(Arc::new(value), payload_type)
    }

    /// Wrap an already shared payload
    pub fn from_payload(payload: Payload, payload_type: TypeDescriptor) -> Self {
        Self {
            payload,
            payload_type,
            qualifiers: Vec::new(),
            injection_point: None,
            type_hint: None,
        }
    }

    /// Add a qualifier
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Add qualifiers
    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        self.qualifiers.extend(qualifiers);
        self
    }

    /// Record the injection point the event was fired through
    pub fn with_injection_point(mut self, injection_point: InjectionPoint) -> Self {
        self.injection_point = Some(injection_point);
        self
    }

    /// Provide a parameterized type used to resolve type variables of the payload type
    pub fn with_type_hint(mut self, hint: TypeDescriptor) -> Self {
        self.type_hint = Some(hint);
        self
    }

    /// Shared payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Runtime type of the payload as declared by the firer
    pub fn payload_type(&self) -> &TypeDescriptor {
        &self.payload_type
    }

    /// Qualifiers given by the firer (without the implicit `@Any`)
    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    /// Injection point the event was fired through
    pub fn injection_point(&self) -> Option<&InjectionPoint> {
        self.injection_point.as_ref()
    }

    /// Parameterized type hint
    pub fn type_hint(&self) -> Option<&TypeDescriptor> {
        self.type_hint.as_ref()
    }
}

impl fmt::Debug for FiredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiredEvent")
            .field("payload_type", &self.payload_type)
            .field("qualifiers", &self.qualifiers)
            .field("type_hint", &self.type_hint)
            .finish_non_exhaustive()
    }
}

/// What an observer may learn about the event it receives
#[derive(Debug, Clone)]
pub struct EventMetadata {
    /// Resolved event type
    pub event_type: TypeDescriptor,
    /// Every qualifier of the event, `@Any` included
    pub qualifiers: Arc<[Qualifier]>,
    /// Injection point the event was fired through
    pub injection_point: Option<InjectionPoint>,
}
