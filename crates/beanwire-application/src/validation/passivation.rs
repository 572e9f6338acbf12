//! Passivation validation
//!
//! Beans of passivating scopes (session, conversation) may be written out
//! and restored by the surrounding runtime. Definition-time checks make sure
//! such beans declare a passivation id and only retain passivation-capable
//! dependents; the runtime check asks the serialization facility about each
//! new instance.

use crate::contexts::Instance;
use beanwire_domain::entities::BeanMetadata;
use beanwire_domain::error::Result;
use beanwire_domain::ports::{BeanMetadataProvider, SharedSerializationFacility};
use beanwire_domain::value_objects::ScopeKind;
use tracing::debug;

/// Checks beans and instances destined for passivating scopes
pub struct PassivationValidator {
    serialization: SharedSerializationFacility,
}

impl PassivationValidator {
    /// Validator delegating runtime checks to `serialization`
    pub fn new(serialization: SharedSerializationFacility) -> Self {
        Self { serialization }
    }

    /// Definition problems of `bean`; empty when it is valid
    pub fn validate_bean(
        &self,
        bean: &BeanMetadata,
        metadata: &dyn BeanMetadataProvider,
    ) -> Vec<String> {
        if !bean.scope.is_passivating() {
            return Vec::new();
        }
        let mut problems = Vec::new();
        if !bean.is_passivation_capable() {
            problems.push(format!(
                "bean {} declares passivating scope {} but is not passivation capable",
                bean.id, bean.scope
            ));
        }
        for injection_point in bean.injection_points.iter().filter(|ip| !ip.transient) {
            let Some(target) = injection_point
                .target
                .as_ref()
                .and_then(|target| metadata.bean_metadata(target))
            else {
                continue;
            };
            if target.scope == ScopeKind::Dependent && !target.is_passivation_capable() {
                problems.push(format!(
                    "injection point {} of passivating bean {} retains dependent bean {} which is not passivation capable",
                    injection_point.required_type, bean.id, target.id
                ));
            }
        }
        problems
    }

    /// Confirm that `instance` of `bean` can be serialized
    pub fn validate_instance(&self, bean: &BeanMetadata, instance: &Instance) -> Result<()> {
        self.serialization
            .check_serializable(&bean.id, instance.as_ref())?;
        debug!(bean = %bean.id, "Instance passed passivation check");
        Ok(())
    }
}
