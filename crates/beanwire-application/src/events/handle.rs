//! Injectable event handles
//!
//! An [`EventHandle`] is what a bean receives for an `Event<T>` injection
//! point: a specified type, a qualifier set and the way to fire.

use super::dispatcher::EventDispatcher;
use crate::resolution::validate_qualifiers;
use beanwire_domain::entities::{FiredEvent, InjectionPoint};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{Qualifier, TypeDescriptor};
use std::any::Any;
use std::sync::Arc;

/// Fires events of a specified type with a fixed qualifier set
#[derive(Clone)]
pub struct EventHandle {
    dispatcher: Arc<EventDispatcher>,
    specified_type: TypeDescriptor,
    qualifiers: Vec<Qualifier>,
    injection_point: Option<InjectionPoint>,
}

impl EventHandle {
    /// Handle firing `specified_type` without qualifiers
    pub fn new(dispatcher: Arc<EventDispatcher>, specified_type: TypeDescriptor) -> Self {
        Self {
            dispatcher,
            specified_type,
            qualifiers: Vec::new(),
            injection_point: None,
        }
    }

    /// Handle for an injection point; its qualifiers become the handle's
    pub fn for_injection_point(
        dispatcher: Arc<EventDispatcher>,
        specified_type: TypeDescriptor,
        injection_point: InjectionPoint,
    ) -> Result<Self> {
        validate_qualifiers(&injection_point.qualifiers)?;
        Ok(Self {
            dispatcher,
            specified_type,
            qualifiers: injection_point.qualifiers.clone(),
            injection_point: Some(injection_point),
        })
    }

    /// Specified type
    pub fn specified_type(&self) -> &TypeDescriptor {
        &self.specified_type
    }

    /// Qualifiers added to every fired event
    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    /// Narrow by additional qualifiers
    pub fn select(&self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Result<Self> {
        let mut combined = self.qualifiers.clone();
        combined.extend(qualifiers);
        validate_qualifiers(&combined)?;
        Ok(Self {
            qualifiers: combined,
            ..self.clone()
        })
    }

    /// Narrow to a subtype and additional qualifiers
    pub fn select_subtype(
        &self,
        subtype: TypeDescriptor,
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> Result<Self> {
        if subtype.contains_type_variable() {
            return Err(Error::unresolved_type_variable(&subtype));
        }
        let narrowed = self.select(qualifiers)?;
        Ok(Self {
            specified_type: subtype,
            ..narrowed
        })
    }

    /// Fire `payload`, whose runtime type is the specified type
    pub fn fire<T: Any + Send + Sync>(&self, payload: T) -> Result<()> {
        self.fire_as(payload, self.specified_type.clone())
    }

    /// Fire `payload` whose runtime type is `runtime_type`
    pub fn fire_as<T: Any + Send + Sync>(&self, payload: T, runtime_type: TypeDescriptor) -> Result<()> {
        let mut event = FiredEvent::new(payload, runtime_type)
            .with_qualifiers(self.qualifiers.iter().cloned())
            .with_type_hint(self.specified_type.clone());
        if let Some(injection_point) = &self.injection_point {
            event = event.with_injection_point(injection_point.clone());
        }
        self.dispatcher.fire(event)
    }
}

impl std::fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandle")
            .field("specified_type", &self.specified_type)
            .field("qualifiers", &self.qualifiers)
            .finish_non_exhaustive()
    }
}
