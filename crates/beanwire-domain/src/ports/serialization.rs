//! Serialization Facility Port
//!
//! Used by passivation validation to confirm, at runtime, that a value held
//! by a passivating scope can actually be serialized. The serialized form
//! itself is the facility's business.

use crate::error::Result;
use crate::value_objects::BeanId;
use std::any::Any;
use std::sync::Arc;

/// Runtime serializability check
pub trait SerializationFacility: Send + Sync {
    /// `Ok(())` when `value`, an instance of `bean`, can be serialized
    fn check_serializable(&self, bean: &BeanId, value: &(dyn Any + Send + Sync)) -> Result<()>;
}

/// Shared serialization facility for dependency injection
pub type SharedSerializationFacility = Arc<dyn SerializationFacility>;
