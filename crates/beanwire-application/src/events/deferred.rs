//! Observer notifications deferred to a transaction phase

use super::ambient::AmbientState;
use super::dispatcher::{EventDispatcher, PreparedEvent, invoke_observer};
use crate::contexts::{BoundContext, Context, ContextStore};
use crate::lifecycle::notify_scope;
use crate::observers::ObserverMethod;
use crate::utils::panic_message;
use beanwire_domain::entities::TransactionPhase;
use beanwire_domain::ports::{Synchronization, TransactionOutcome};
use beanwire_domain::value_objects::{Qualifier, ScopeKind};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Completion callback notifying one observer in its phase
///
/// Captures the firer's ambient state and session binding; the original
/// transaction is not carried, it is the one completing.
pub(crate) struct DeferredNotification {
    observer: Arc<ObserverMethod>,
    event: Arc<PreparedEvent>,
    dispatcher: EventDispatcher,
    ambient: AmbientState,
    session: Option<Arc<ContextStore>>,
}

impl DeferredNotification {
    pub(crate) fn new(
        observer: Arc<ObserverMethod>,
        event: Arc<PreparedEvent>,
        dispatcher: EventDispatcher,
        ambient: AmbientState,
    ) -> Self {
        let session = dispatcher.contexts().session().current();
        Self {
            observer,
            event,
            dispatcher,
            ambient,
            session,
        }
    }

    fn phase(&self) -> TransactionPhase {
        self.observer.descriptor().phase
    }

    fn run(&self) {
        let observer = self.observer.id();
        let contexts = self.dispatcher.contexts();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ambient = self.ambient.clone().install();
            let _session = SessionBinding::restore(contexts.session(), self.session.clone());
            let _request = TemporaryRequest::activate(&self.dispatcher);
            let scope = &self.observer.descriptor().scope;
            if !contexts.is_active(scope) {
                debug!(observer = %observer, scope = %scope, "Skipped deferred observer, scope inactive");
                return Ok(());
            }
            invoke_observer(
                contexts,
                self.dispatcher.transactions().as_ref(),
                &self.observer,
                &self.event,
                self.phase(),
                &self.ambient,
            )
        }));
        match outcome {
            Ok(Ok(())) => {
                debug!(observer = %observer, phase = ?self.phase(), "Notified deferred observer");
            }
            Ok(Err(e)) => {
                error!(
                    observer = %observer,
                    phase = ?self.phase(),
                    error = %e,
                    "Deferred observer failed"
                );
            }
            Err(panic) => {
                error!(
                    observer = %observer,
                    phase = ?self.phase(),
                    panic = %panic_message(panic.as_ref()),
                    "Deferred observer panicked"
                );
            }
        }
    }
}

impl Synchronization for DeferredNotification {
    fn before_completion(&self) {
        if self.phase() == TransactionPhase::BeforeCompletion {
            self.run();
        }
    }

    fn after_completion(&self, outcome: TransactionOutcome) {
        let due = matches!(
            (self.phase(), outcome),
            (TransactionPhase::AfterCompletion, _)
                | (TransactionPhase::AfterSuccess, TransactionOutcome::Committed)
                | (TransactionPhase::AfterFailure, TransactionOutcome::RolledBack)
        );
        if due {
            self.run();
        }
    }
}

/// Re-binds the firer's session on a thread that has none
struct SessionBinding<'a> {
    session: Option<&'a Arc<BoundContext>>,
}

impl<'a> SessionBinding<'a> {
    fn restore(context: &'a Arc<BoundContext>, store: Option<Arc<ContextStore>>) -> Self {
        match store {
            Some(store) if context.current().is_none() => {
                context.bind(store);
                Self {
                    session: Some(context),
                }
            }
            _ => Self { session: None },
        }
    }
}

impl Drop for SessionBinding<'_> {
    fn drop(&mut self) {
        if let Some(context) = self.session {
            context.unbind();
        }
    }
}

/// Request context activated for one deferred notification on a thread
/// that has none; its boundaries are announced like any other request
struct TemporaryRequest<'a> {
    dispatcher: &'a EventDispatcher,
    id: String,
}

impl<'a> TemporaryRequest<'a> {
    fn activate(dispatcher: &'a EventDispatcher) -> Option<Self> {
        let contexts = dispatcher.contexts();
        if contexts.request().is_active() {
            return None;
        }
        contexts
            .request()
            .bind(contexts.new_store(ScopeKind::Request));
        let request = Self {
            dispatcher,
            id: Uuid::new_v4().to_string(),
        };
        notify_scope(
            dispatcher,
            Qualifier::initialized(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&request.id),
        );
        Some(request)
    }
}

impl Drop for TemporaryRequest<'_> {
    fn drop(&mut self) {
        notify_scope(
            self.dispatcher,
            Qualifier::before_destroyed(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&self.id),
        );
        if let Some(store) = self.dispatcher.contexts().request().unbind() {
            store.destroy_all();
        }
        notify_scope(
            self.dispatcher,
            Qualifier::destroyed(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&self.id),
        );
    }
}
