//! Serialization facilities
//!
//! Passivating scopes ask the facility whether a freshly created instance
//! could be written out. [`SerdeSerializationFacility`] answers with a real
//! `serde_json` serialization of every type registered with it; values of
//! unregistered types are not serializable. [`PermissiveSerialization`]
//! accepts everything.

use beanwire_domain::error::{Error, Result};
use beanwire_domain::ports::SerializationFacility;
use beanwire_domain::value_objects::BeanId;
use serde::Serialize;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use tracing::debug;

type Check = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Option<serde_json::Result<()>> + Send + Sync>;

struct Registration {
    type_name: &'static str,
    check: Check,
}

/// Serialization facility backed by per-type `serde_json` checks
#[derive(Default)]
pub struct SerdeSerializationFacility {
    registrations: HashMap<TypeId, Registration>,
}

impl SerdeSerializationFacility {
    /// Facility without registered types
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` (builder form)
    pub fn with_type<T>(mut self) -> Self
    where
        T: Serialize + Any + Send + Sync,
    {
        self.register::<T>();
        self
    }

    /// Register `T` as serializable
    pub fn register<T>(&mut self)
    where
        T: Serialize + Any + Send + Sync,
    {
        let check: Check = Box::new(|value| {
            value
                .downcast_ref::<T>()
                .map(|typed| serde_json::to_vec(typed).map(|_| ()))
        });
        self.registrations.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: type_name::<T>(),
                check,
            },
        );
    }

    /// True when `T` was registered
    pub fn is_registered<T: Any>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl SerializationFacility for SerdeSerializationFacility {
    fn check_serializable(&self, bean: &BeanId, value: &(dyn Any + Send + Sync)) -> Result<()> {
        let Some(registration) = self.registrations.get(&(*value).type_id()) else {
            return Err(Error::not_serializable(
                bean,
                "the instance type is not registered as serializable",
            ));
        };
        match (registration.check)(value) {
            Some(Ok(())) => {
                debug!(bean = %bean, type_name = registration.type_name, "Instance is serializable");
                Ok(())
            }
            Some(Err(e)) => Err(Error::not_serializable(
                bean,
                format!("{} failed to serialize: {e}", registration.type_name),
            )),
            None => Err(Error::internal(format!(
                "registration for {} received a value of another type",
                registration.type_name
            ))),
        }
    }
}

impl std::fmt::Debug for SerdeSerializationFacility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.registrations.values().map(|r| r.type_name).collect();
        types.sort_unstable();
        f.debug_struct("SerdeSerializationFacility")
            .field("types", &types)
            .finish()
    }
}

/// Facility that considers every value serializable
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveSerialization;

impl SerializationFacility for PermissiveSerialization {
    fn check_serializable(&self, _bean: &BeanId, _value: &(dyn Any + Send + Sync)) -> Result<()> {
        Ok(())
    }
}
