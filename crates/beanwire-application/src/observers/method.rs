//! Observer methods
//!
//! An [`ObserverMethod`] pairs an immutable descriptor with the callable
//! that receives events. The callable gets an [`ObserverInvocation`] giving
//! it the event, its metadata, the receiver instance, parameter injection
//! and the rollback-request capability.

use crate::contexts::{ContextManager, CreationalContext, Instance};
use crate::events::AmbientState;
use beanwire_domain::entities::{EventMetadata, ObserverDescriptor, Payload, TransactionPhase};
use beanwire_domain::error::{BoxError, Error, Result};
use beanwire_domain::ports::TransactionServices;
use beanwire_domain::value_objects::{BeanId, ObserverId};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Failure raised by an observer
#[derive(Debug)]
pub enum ObserverFailure {
    /// A failure the observer declares (wrapped as an observer exception)
    Checked(BoxError),
    /// A failure the observer does not declare (propagated as is)
    Runtime(BoxError),
}

impl ObserverFailure {
    /// Declared failure
    pub fn checked(error: impl Into<BoxError>) -> Self {
        ObserverFailure::Checked(error.into())
    }

    /// Undeclared failure
    pub fn runtime(error: impl Into<BoxError>) -> Self {
        ObserverFailure::Runtime(error.into())
    }

    /// Convert into the error surfaced by `fire`
    pub fn into_error(self, observer: &ObserverId) -> Error {
        match self {
            ObserverFailure::Checked(source) => Error::ObserverException {
                observer: observer.to_string(),
                source,
            },
            ObserverFailure::Runtime(source) => Error::ObserverFailed {
                observer: observer.to_string(),
                source,
            },
        }
    }
}

impl From<Error> for ObserverFailure {
    fn from(error: Error) -> Self {
        ObserverFailure::Runtime(Box::new(error))
    }
}

impl fmt::Display for ObserverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverFailure::Checked(e) | ObserverFailure::Runtime(e) => write!(f, "{e}"),
        }
    }
}

/// Outcome of one observer notification
pub type ObserverResult = std::result::Result<(), ObserverFailure>;

type Handler = dyn Fn(&ObserverInvocation<'_>) -> ObserverResult + Send + Sync;

/// An observer: descriptor plus notification callable
pub struct ObserverMethod {
    descriptor: ObserverDescriptor,
    handler: Box<Handler>,
}

impl ObserverMethod {
    /// Observer described by `descriptor`, notified through `handler`
    pub fn new<F>(descriptor: ObserverDescriptor, handler: F) -> Self
    where
        F: Fn(&ObserverInvocation<'_>) -> ObserverResult + Send + Sync + 'static,
    {
        Self {
            descriptor,
            handler: Box::new(handler),
        }
    }

    /// Immutable descriptor
    pub fn descriptor(&self) -> &ObserverDescriptor {
        &self.descriptor
    }

    /// Bean + method identity
    pub fn id(&self) -> &ObserverId {
        &self.descriptor.id
    }

    /// Deliver one event
    pub fn notify(&self, invocation: &ObserverInvocation<'_>) -> ObserverResult {
        (self.handler)(invocation)
    }
}

impl fmt::Debug for ObserverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverMethod")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Everything an observer sees during one notification
pub struct ObserverInvocation<'a> {
    pub(crate) payload: &'a Payload,
    pub(crate) metadata: &'a EventMetadata,
    pub(crate) receiver: Option<Instance>,
    pub(crate) creational: &'a CreationalContext,
    pub(crate) contexts: &'a ContextManager,
    pub(crate) transactions: &'a dyn TransactionServices,
    pub(crate) phase: TransactionPhase,
    pub(crate) ambient: &'a AmbientState,
}

impl ObserverInvocation<'_> {
    /// Event payload
    pub fn payload(&self) -> &Payload {
        self.payload
    }

    /// Event payload downcast to `T`
    pub fn event<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Resolved type, qualifiers and injection point of the event
    pub fn metadata(&self) -> &EventMetadata {
        self.metadata
    }

    /// Instance of the declaring bean, when the observer has one
    pub fn receiver(&self) -> Option<&Instance> {
        self.receiver.as_ref()
    }

    /// Receiver downcast to `T`
    pub fn receiver_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.receiver.clone().and_then(|r| r.downcast::<T>().ok())
    }

    /// Inject an additional parameter
    ///
    /// Dependent instances obtained here are destroyed as soon as the
    /// notification returns.
    pub fn resolve(&self, bean: &BeanId) -> Result<Instance> {
        self.contexts.get_instance(bean, self.creational)
    }

    /// Phase the notification runs in
    pub fn phase(&self) -> TransactionPhase {
        self.phase
    }

    /// Ambient state of the code that fired the event
    pub fn ambient(&self) -> &AmbientState {
        self.ambient
    }

    /// Ask the ambient transaction to roll back
    ///
    /// Only allowed while the transaction is still open, that is during an
    /// immediate notification inside a transaction or in the
    /// before-completion phase.
    pub fn request_rollback(&self) -> Result<()> {
        let allowed = matches!(
            self.phase,
            TransactionPhase::InProgress | TransactionPhase::BeforeCompletion
        ) && self.transactions.is_transaction_active();
        if !allowed {
            return Err(Error::IllegalTransactionOperation {
                message: format!("rollback cannot be requested in phase {:?}", self.phase),
            });
        }
        self.transactions.set_rollback_only()
    }
}
