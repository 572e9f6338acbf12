//! Deployment definition checks
//!
//! Run once when the container is built. Every problem is collected and the
//! whole list is reported as a single definition error.

use super::passivation::PassivationValidator;
use crate::beans::BeanRegistry;
use crate::observers::ObserverRegistry;
use beanwire_domain::constants::EVENT_HANDLE_CLASS;
use beanwire_domain::entities::{BeanKind, Reception};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{ScopeKind, TypeDescriptor};
use tracing::{error, info};

/// Validates beans and observers of a deployment
pub struct DefinitionValidator<'a> {
    passivation: Option<&'a PassivationValidator>,
}

impl<'a> DefinitionValidator<'a> {
    /// Validator; passivation rules run only when `passivation` is given
    pub fn new(passivation: Option<&'a PassivationValidator>) -> Self {
        Self { passivation }
    }

    /// Every problem found, in a stable order
    pub fn problems(&self, beans: &BeanRegistry, observers: &ObserverRegistry) -> Vec<String> {
        let mut problems = Vec::new();

        for observer in observers.all() {
            let descriptor = observer.descriptor();
            if descriptor.event_parameters != 1 {
                problems.push(format!(
                    "observer {} declares {} event parameters, exactly one is required",
                    descriptor.id, descriptor.event_parameters
                ));
            }
            if descriptor.reception == Reception::IfExists
                && descriptor.scope == ScopeKind::Dependent
            {
                problems.push(format!(
                    "conditional observer {} is declared by a Dependent bean",
                    descriptor.id
                ));
            }
            if let Some(bean) = beans.get(descriptor.bean()) {
                let kind = bean.metadata().kind;
                if matches!(kind, BeanKind::Interceptor | BeanKind::Decorator) {
                    problems.push(format!(
                        "observer {} is declared by {:?} {}",
                        descriptor.id,
                        kind,
                        bean.id()
                    ));
                }
                if bean.scope() != &descriptor.scope {
                    problems.push(format!(
                        "observer {} records scope {} but bean {} has scope {}",
                        descriptor.id,
                        descriptor.scope,
                        bean.id(),
                        bean.scope()
                    ));
                }
            }
        }

        let mut all = beans.all();
        all.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        for bean in &all {
            let metadata = bean.metadata();
            for injection_point in &metadata.injection_points {
                if is_raw_event_handle(&injection_point.required_type) {
                    problems.push(format!(
                        "bean {} injects the raw {EVENT_HANDLE_CLASS} type without a type argument",
                        metadata.id
                    ));
                }
            }
            if let Some(passivation) = self.passivation {
                problems.extend(passivation.validate_bean(metadata, beans));
            }
        }
        problems
    }

    /// Fail with one definition error listing every problem
    pub fn validate(&self, beans: &BeanRegistry, observers: &ObserverRegistry) -> Result<()> {
        let problems = self.problems(beans, observers);
        if problems.is_empty() {
            info!(beans = beans.len(), observers = observers.len(), "Definitions validated");
            return Ok(());
        }
        for problem in &problems {
            error!(problem = %problem, "Definition problem");
        }
        Err(Error::definition(problems))
    }
}

fn is_raw_event_handle(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Class(id) if id.as_str() == EVENT_HANDLE_CLASS)
}
