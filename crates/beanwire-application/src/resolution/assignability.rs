//! Type assignability for observer resolution
//!
//! Answers "is an event of type `E` delivered to an observer of type `O`?".
//! The rules follow the event-typing rules of a contextual container, not
//! general assignability: type arguments are compared by raw identity,
//! wildcards and type variables by their bounds.

use beanwire_domain::entities::TypeHierarchy;
use beanwire_domain::value_objects::TypeDescriptor;
use std::sync::Arc;

/// Assignability rules over a class hierarchy
#[derive(Debug, Clone, Default)]
pub struct TypeAssignability {
    hierarchy: Arc<TypeHierarchy>,
}

impl TypeAssignability {
    /// Rules over `hierarchy`
    pub fn new(hierarchy: Arc<TypeHierarchy>) -> Self {
        Self { hierarchy }
    }

    /// Class hierarchy in use
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// The event type followed by every supertype
    pub fn type_closure(&self, event_type: &TypeDescriptor) -> Vec<TypeDescriptor> {
        self.hierarchy.type_closure(event_type)
    }

    /// True when some type of `event_closure` is assignable to `observed`
    pub fn observes(&self, event_closure: &[TypeDescriptor], observed: &TypeDescriptor) -> bool {
        event_closure.iter().any(|t| self.is_assignable(t, observed))
    }

    /// Whether an event of type `event` satisfies `observed`
    pub fn is_assignable(&self, event: &TypeDescriptor, observed: &TypeDescriptor) -> bool {
        match (event, observed) {
            (TypeDescriptor::Variable { bound, .. }, _) => match bound.as_deref() {
                Some(bound) => self.is_assignable(bound, observed),
                None => is_object(observed),
            },
            (_, TypeDescriptor::Variable { bound, .. }) => bound
                .as_deref()
                .is_none_or(|bound| self.is_assignable(event, bound)),
            (_, TypeDescriptor::Wildcard { .. }) => self.satisfies_wildcard(event, observed),
            (TypeDescriptor::Class(sub), TypeDescriptor::Class(sup)) => {
                self.hierarchy.is_subclass(sub, sup)
            }
            (TypeDescriptor::Parameterized { raw, .. }, TypeDescriptor::Class(sup)) => {
                raw == sup || sup.is_object()
            }
            (
                TypeDescriptor::Class(raw),
                TypeDescriptor::Parameterized {
                    raw: observed_raw,
                    args,
                },
            ) => raw == observed_raw && args.iter().all(is_unconstrained),
            (
                TypeDescriptor::Parameterized { raw, args },
                TypeDescriptor::Parameterized {
                    raw: observed_raw,
                    args: observed_args,
                },
            ) => {
                raw == observed_raw
                    && args.len() == observed_args.len()
                    && args
                        .iter()
                        .zip(observed_args.iter())
                        .all(|(arg, observed_arg)| self.argument_matches(arg, observed_arg))
            }
            (TypeDescriptor::Wildcard { upper, .. }, _) => upper
                .as_deref()
                .map_or_else(|| is_object(observed), |u| self.is_assignable(u, observed)),
        }
    }

    fn argument_matches(&self, arg: &TypeDescriptor, observed_arg: &TypeDescriptor) -> bool {
        match observed_arg {
            TypeDescriptor::Wildcard { .. } => self.satisfies_wildcard(arg, observed_arg),
            TypeDescriptor::Variable { bound, .. } => bound
                .as_deref()
                .is_none_or(|bound| self.is_assignable(arg, bound)),
            TypeDescriptor::Class(observed_raw) => match arg {
                TypeDescriptor::Class(raw) => raw == observed_raw,
                // an event argument never carries variables once fired,
                // but observed `List<Object>` accepts a bounded one
                TypeDescriptor::Variable { .. } => self.is_assignable(arg, observed_arg),
                _ => false,
            },
            TypeDescriptor::Parameterized {
                raw: observed_raw, ..
            } => match arg {
                TypeDescriptor::Parameterized { raw, .. } => {
                    raw == observed_raw && self.is_assignable(arg, observed_arg)
                }
                _ => false,
            },
        }
    }

    fn satisfies_wildcard(&self, arg: &TypeDescriptor, wildcard: &TypeDescriptor) -> bool {
        let TypeDescriptor::Wildcard { upper, lower } = wildcard else {
            return false;
        };
        let upper_ok = upper
            .as_deref()
            .is_none_or(|upper| self.is_assignable(arg, upper));
        let lower_ok = lower
            .as_deref()
            .is_none_or(|lower| self.is_assignable(lower, arg));
        upper_ok && lower_ok
    }
}

fn is_object(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Class(id) if id.is_object())
}

/// `Object`, `?` or an unbounded variable: any argument satisfies it
fn is_unconstrained(arg: &TypeDescriptor) -> bool {
    match arg {
        TypeDescriptor::Class(id) => id.is_object(),
        TypeDescriptor::Wildcard { upper, lower } => {
            lower.is_none() && upper.as_deref().is_none_or(is_object)
        }
        TypeDescriptor::Variable { bound, .. } => bound.as_deref().is_none_or(is_object),
        TypeDescriptor::Parameterized { .. } => false,
    }
}
