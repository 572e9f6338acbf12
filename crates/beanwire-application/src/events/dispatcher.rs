//! Event dispatcher

use super::ambient::AmbientState;
use super::deferred::DeferredNotification;
use crate::contexts::{ContextManager, CreationalContext, Instance};
use crate::observers::{ObserverInvocation, ObserverMethod, ObserverRegistry};
use crate::resolution::event_qualifiers;
use beanwire_domain::entities::{EventMetadata, FiredEvent, Payload, Reception, TransactionPhase};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::events::ContainerLifecycleEvent;
use beanwire_domain::ports::{SharedTransactionServices, TransactionServices};
use beanwire_domain::value_objects::{Qualifier, TypeDescriptor};
use std::sync::Arc;
use tracing::debug;

/// An event whose type and qualifiers are resolved
pub(crate) struct PreparedEvent {
    pub(crate) payload: Payload,
    pub(crate) metadata: EventMetadata,
}

/// Fires events at the observers resolved for them
#[derive(Clone)]
pub struct EventDispatcher {
    observers: Arc<ObserverRegistry>,
    contexts: Arc<ContextManager>,
    transactions: SharedTransactionServices,
}

impl EventDispatcher {
    /// Dispatcher over `observers`, reaching receivers through `contexts`
    pub fn new(
        observers: Arc<ObserverRegistry>,
        contexts: Arc<ContextManager>,
        transactions: SharedTransactionServices,
    ) -> Self {
        Self {
            observers,
            contexts,
            transactions,
        }
    }

    /// Observer registry
    pub fn observers(&self) -> &Arc<ObserverRegistry> {
        &self.observers
    }

    /// Context manager
    pub fn contexts(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    /// Transaction services
    pub fn transactions(&self) -> &SharedTransactionServices {
        &self.transactions
    }

    /// Fire an application event
    ///
    /// Immediate observers run on the calling thread. The first failing one
    /// aborts the fire and its failure is returned; observers deferred to a
    /// transaction phase never affect the result.
    pub fn fire(&self, event: FiredEvent) -> Result<()> {
        let prepared = self.prepare(&event)?;
        self.reject_reserved(&prepared.metadata.event_type)?;
        let observers = self.observers.resolve(
            &prepared.metadata.event_type,
            &prepared.metadata.qualifiers,
            false,
        );
        self.dispatch(Arc::new(prepared), &observers)
    }

    /// Fire a container lifecycle event at extension observers
    pub fn fire_container_event(&self, kind: ContainerLifecycleEvent, payload: Payload) -> Result<()> {
        let prepared = PreparedEvent {
            payload,
            metadata: EventMetadata {
                event_type: kind.type_descriptor(),
                qualifiers: Arc::from(vec![Qualifier::any()]),
                injection_point: None,
            },
        };
        let observers = self.observers.resolve(
            &prepared.metadata.event_type,
            &prepared.metadata.qualifiers,
            true,
        );
        debug!(event = kind.class_name(), observers = observers.len(), "Firing container event");
        self.dispatch(Arc::new(prepared), &observers)
    }

    /// Observers `event` would be delivered to, without notifying them
    pub fn resolve_observers(&self, event: &FiredEvent) -> Result<Vec<Arc<ObserverMethod>>> {
        let prepared = self.prepare(event)?;
        Ok(self
            .observers
            .resolve(
                &prepared.metadata.event_type,
                &prepared.metadata.qualifiers,
                false,
            )
            .to_vec())
    }

    fn prepare(&self, event: &FiredEvent) -> Result<PreparedEvent> {
        let event_type = resolve_event_type(event)?;
        let qualifiers = event_qualifiers(event.qualifiers())?;
        Ok(PreparedEvent {
            payload: event.payload().clone(),
            metadata: EventMetadata {
                event_type,
                qualifiers: Arc::from(qualifiers),
                injection_point: event.injection_point().cloned(),
            },
        })
    }

    fn reject_reserved(&self, event_type: &TypeDescriptor) -> Result<()> {
        let assignability = self.observers.assignability();
        let closure = assignability.type_closure(event_type);
        for reserved in ContainerLifecycleEvent::ALL {
            let reserved_type = reserved.type_descriptor();
            if assignability.observes(&closure, &reserved_type) {
                return Err(Error::ReservedEventType {
                    event_type: event_type.to_string(),
                    reserved: reserved_type.to_string(),
                });
            }
        }
        Ok(())
    }

    fn dispatch(&self, event: Arc<PreparedEvent>, observers: &[Arc<ObserverMethod>]) -> Result<()> {
        let ambient = AmbientState::current();
        for observer in observers {
            let descriptor = observer.descriptor();
            if descriptor.is_transactional() && self.transactions.is_transaction_active() {
                let deferred = DeferredNotification::new(
                    observer.clone(),
                    event.clone(),
                    self.clone(),
                    ambient.clone(),
                );
                self.transactions
                    .register_synchronization(Arc::new(deferred))?;
                debug!(observer = %observer.id(), phase = ?descriptor.phase, "Deferred observer");
                continue;
            }
            if !self.contexts.is_active(&descriptor.scope) {
                debug!(observer = %observer.id(), scope = %descriptor.scope, "Skipped observer, scope inactive");
                continue;
            }
            invoke_observer(
                &self.contexts,
                self.transactions.as_ref(),
                observer,
                &event,
                TransactionPhase::InProgress,
                &ambient,
            )?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

/// Use the hint when the payload's own type still has type variables
fn resolve_event_type(event: &FiredEvent) -> Result<TypeDescriptor> {
    let declared = event.payload_type();
    let resolved = match event.type_hint() {
        Some(hint)
            if declared.contains_type_variable() && hint.raw_class() == declared.raw_class() =>
        {
            hint.clone()
        }
        _ => declared.clone(),
    };
    if resolved.contains_type_variable() {
        return Err(Error::unresolved_type_variable(&resolved));
    }
    Ok(resolved)
}

/// Notify one observer now
///
/// Dependent objects created for the notification, the receiver included
/// when its bean is dependent, are destroyed before returning.
pub(crate) fn invoke_observer(
    contexts: &ContextManager,
    transactions: &dyn TransactionServices,
    observer: &ObserverMethod,
    event: &PreparedEvent,
    phase: TransactionPhase,
    ambient: &AmbientState,
) -> Result<()> {
    let creational = CreationalContext::new();
    let receiver = match obtain_receiver(contexts, observer, &creational) {
        Ok(Some(receiver)) => receiver,
        Ok(None) => return Ok(()),
        Err(e) => {
            creational.release();
            return Err(e);
        }
    };
    let invocation = ObserverInvocation {
        payload: &event.payload,
        metadata: &event.metadata,
        receiver,
        creational: &creational,
        contexts,
        transactions,
        phase,
        ambient,
    };
    let outcome = observer.notify(&invocation);
    drop(invocation);
    creational.release();
    outcome.map_err(|failure| failure.into_error(observer.id()))
}

/// `None` when a conditional observer has no existing receiver;
/// `Some(None)` when the observer is not backed by a registered bean
fn obtain_receiver(
    contexts: &ContextManager,
    observer: &ObserverMethod,
    creational: &CreationalContext,
) -> Result<Option<Option<Instance>>> {
    let descriptor = observer.descriptor();
    let bean = descriptor.bean();
    if contexts.beans().get(bean).is_none() {
        return Ok(Some(None));
    }
    match descriptor.reception {
        Reception::IfExists => match contexts.get_existing(bean)? {
            Some(existing) => Ok(Some(Some(existing))),
            None => {
                debug!(observer = %observer.id(), "Skipped conditional observer, no instance");
                Ok(None)
            }
        },
        Reception::Always => Ok(Some(Some(contexts.get_instance(bean, creational)?))),
    }
}
