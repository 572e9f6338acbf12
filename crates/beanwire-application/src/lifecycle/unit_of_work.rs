//! Units of work
//!
//! A unit of work is the request boundary: it activates the request
//! context on the calling thread, binds the session and a conversation,
//! and undoes all of it, with notifications, when it ends.

use super::notifications::notify_scope;
use crate::contexts::ContextManager;
use crate::conversation::{Conversation, ConversationAssociation, ConversationManager, Session};
use crate::events::EventDispatcher;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{ConversationSignal, Qualifier, ScopeKind};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Drives scope activation and teardown
#[derive(Clone)]
pub struct ScopeLifecycle {
    contexts: Arc<ContextManager>,
    dispatcher: Arc<EventDispatcher>,
    conversations: Arc<ConversationManager>,
}

impl ScopeLifecycle {
    /// Lifecycle over the given collaborators
    pub fn new(
        contexts: Arc<ContextManager>,
        dispatcher: Arc<EventDispatcher>,
        conversations: Arc<ConversationManager>,
    ) -> Self {
        Self {
            contexts,
            dispatcher,
            conversations,
        }
    }

    /// Activate the application context
    pub fn start_application(&self) {
        if self.contexts.application().activate() {
            self.announce_application();
        }
    }

    /// Fire `@Initialized(Application)` for a context activated ahead of time
    ///
    /// The container activates the application context before discovery so
    /// extensions can observe container events, and announces it once the
    /// deployment is valid.
    pub fn announce_application(&self) {
        notify_scope(
            &self.dispatcher,
            Qualifier::initialized(&ScopeKind::Application),
            &ScopeKind::Application,
            None,
        );
        info!("Application context activated");
    }

    /// Tear down the application context
    pub fn stop_application(&self) {
        notify_scope(
            &self.dispatcher,
            Qualifier::before_destroyed(&ScopeKind::Application),
            &ScopeKind::Application,
            None,
        );
        self.contexts.application().deactivate();
        notify_scope(
            &self.dispatcher,
            Qualifier::destroyed(&ScopeKind::Application),
            &ScopeKind::Application,
            None,
        );
        info!("Application context destroyed");
    }

    /// Start a unit of work on the calling thread
    ///
    /// Without a session only the request context is activated.
    pub fn begin(
        &self,
        session: Option<&Arc<Session>>,
        propagated_cid: Option<&str>,
    ) -> Result<UnitOfWork> {
        if self.contexts.request().current().is_some() {
            return Err(Error::internal(
                "a unit of work is already active on this thread",
            ));
        }
        let id = Uuid::new_v4().to_string();
        self.contexts
            .request()
            .bind(self.contexts.new_store(ScopeKind::Request));
        let mut unit = UnitOfWork {
            id,
            lifecycle: self.clone(),
            association: None,
            session_bound: false,
            finished: false,
        };
        notify_scope(
            &self.dispatcher,
            Qualifier::initialized(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&unit.id),
        );

        if let Some(session) = session {
            if session.is_invalidated() {
                return Err(Error::internal(format!(
                    "session {} was invalidated",
                    session.id()
                )));
            }
            self.contexts.session().bind(session.store().clone());
            unit.session_bound = true;
            if session.mark_initialized() {
                notify_scope(
                    &self.dispatcher,
                    Qualifier::initialized(&ScopeKind::Session),
                    &ScopeKind::Session,
                    Some(session.id()),
                );
            }
            unit.association = Some(
                self.conversations
                    .associate(session, &unit.id, propagated_cid)?,
            );
        }
        debug!(unit = %unit.id, session = ?session.map(|s| s.id()), "Unit of work started");
        Ok(unit)
    }

    /// End `session`, tearing down its conversations and store
    pub fn invalidate_session(&self, session: &Session) {
        self.conversations.invalidate_session(session);
    }
}

/// An active request boundary; ends when dropped if not ended explicitly
pub struct UnitOfWork {
    id: String,
    lifecycle: ScopeLifecycle,
    association: Option<ConversationAssociation>,
    session_bound: bool,
    finished: bool,
}

impl UnitOfWork {
    /// Unit of work id, also the conversation lock owner
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Conversation bound to the unit of work, when a session is present
    pub fn conversation(&self) -> Option<&Conversation> {
        self.association.as_ref().map(|a| a.conversation())
    }

    /// Busy/missing signal raised while associating the conversation
    pub fn conversation_signal(&self) -> Option<&ConversationSignal> {
        self.association.as_ref().and_then(|a| a.signal())
    }

    /// Deactivate everything the unit of work activated
    pub fn end(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let lifecycle = &self.lifecycle;
        let outcome = if self.association.take().is_some() {
            lifecycle.conversations.dissociate()
        } else {
            Ok(())
        };
        if self.session_bound {
            lifecycle.contexts.session().unbind();
        }
        notify_scope(
            &lifecycle.dispatcher,
            Qualifier::before_destroyed(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&self.id),
        );
        if let Some(store) = lifecycle.contexts.request().unbind() {
            store.destroy_all();
        }
        notify_scope(
            &lifecycle.dispatcher,
            Qualifier::destroyed(&ScopeKind::Request),
            &ScopeKind::Request,
            Some(&self.id),
        );
        debug!(unit = %self.id, "Unit of work ended");
        outcome
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            error!(unit = %self.id, error = %e, "Failed to end unit of work");
        }
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("id", &self.id)
            .field("conversation", &self.conversation())
            .field("finished", &self.finished)
            .finish()
    }
}
