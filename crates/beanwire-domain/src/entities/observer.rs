//! Observer method descriptors
//!
//! A descriptor is created while the declaring bean is processed and is
//! immutable afterwards. It carries everything resolution needs: the
//! observed type, the observed qualifiers, the reception mode, the
//! transaction phase and the declaring bean's scope.

use crate::value_objects::{BeanId, ObserverId, Qualifier, ScopeKind, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether an observer may cause its declaring bean to be instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Reception {
    /// Obtain (and if needed create) the declaring bean's instance
    #[default]
    Always,
    /// Notify only if an instance already exists in the active context
    IfExists,
}

/// When, relative to the ambient transaction, an observer is notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionPhase {
    /// Immediately, during `fire`
    #[default]
    InProgress,
    /// In the before-completion phase of the transaction
    BeforeCompletion,
    /// In the after-completion phase, whatever the outcome
    AfterCompletion,
    /// In the after-completion phase, only on commit
    AfterSuccess,
    /// In the after-completion phase, only on rollback
    AfterFailure,
}

impl TransactionPhase {
    /// True for every phase except `InProgress`
    pub fn is_transactional(self) -> bool {
        !matches!(self, TransactionPhase::InProgress)
    }
}

/// Immutable description of an observer method
#[derive(Debug, Clone)]
pub struct ObserverDescriptor {
    /// Bean + method identity
    pub id: ObserverId,
    /// Observed event type
    pub observed_type: TypeDescriptor,
    /// Observed qualifiers; empty means "any"
    pub qualifiers: Arc<[Qualifier]>,
    /// Reception mode
    pub reception: Reception,
    /// Transaction phase
    pub phase: TransactionPhase,
    /// Scope of the declaring bean
    pub scope: ScopeKind,
    /// Whether the declaring bean is a portable extension
    pub extension: bool,
    /// Number of parameters annotated as the event parameter
    pub event_parameters: usize,
}

impl ObserverDescriptor {
    /// Describe an observer of `observed_type` declared by `bean`
    pub fn new(
        bean: impl Into<BeanId>,
        method: impl Into<Arc<str>>,
        observed_type: TypeDescriptor,
    ) -> Self {
        Self {
            id: ObserverId::new(bean, method),
            observed_type,
            qualifiers: Arc::from(Vec::new()),
            reception: Reception::Always,
            phase: TransactionPhase::InProgress,
            scope: ScopeKind::Dependent,
            extension: false,
            event_parameters: 1,
        }
    }

    /// Set the observed qualifiers; `@Any` is dropped since every event carries it
    pub fn with_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        let qualifiers: Vec<Qualifier> = qualifiers.into_iter().filter(|q| !q.is_any()).collect();
        self.qualifiers = Arc::from(qualifiers);
        self
    }

    /// Set the reception mode
    pub fn with_reception(mut self, reception: Reception) -> Self {
        self.reception = reception;
        self
    }

    /// Set the transaction phase
    pub fn with_phase(mut self, phase: TransactionPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Set the declaring bean's scope
    pub fn with_scope(mut self, scope: ScopeKind) -> Self {
        self.scope = scope;
        self
    }

    /// Mark the declaring bean as an extension
    pub fn for_extension(mut self) -> Self {
        self.extension = true;
        self.scope = ScopeKind::Application;
        self
    }

    /// Record how many event parameters the method declares
    pub fn with_event_parameters(mut self, count: usize) -> Self {
        self.event_parameters = count;
        self
    }

    /// Declaring bean
    pub fn bean(&self) -> &BeanId {
        &self.id.bean
    }

    /// True when the observer is deferred to a transaction phase
    pub fn is_transactional(&self) -> bool {
        self.phase.is_transactional()
    }
}
