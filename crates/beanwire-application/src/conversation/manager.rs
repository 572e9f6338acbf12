//! Conversation manager
//!
//! Binds each unit of work to exactly one conversation, enforces the
//! one-unit-of-work-per-conversation lock, and tears conversations down at
//! the end of transient units of work, on idle eviction and at session end.

use super::handle::{Conversation, IdGenerator, ManagedConversation};
use super::session::Session;
use crate::contexts::{Context, ContextManager};
use crate::events::EventDispatcher;
use crate::lifecycle::notify_scope;
use beanwire_domain::constants::{
    CONVERSATION_CONCURRENT_ACCESS_TIMEOUT_MS, CONVERSATION_DEFAULT_TIMEOUT_MS,
};
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::{ConversationSignal, Qualifier, ScopeKind};
use dashmap::DashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Owner id used while the reaper inspects a conversation
const EVICTION_OWNER: &str = "conversation-reaper";

/// Timing of conversation handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationSettings {
    /// Idle time before a long-running conversation may be evicted
    pub default_timeout: Duration,
    /// How long a unit of work waits for a busy conversation; zero rejects at once
    pub concurrent_access_timeout: Duration,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(CONVERSATION_DEFAULT_TIMEOUT_MS),
            concurrent_access_timeout: Duration::from_millis(
                CONVERSATION_CONCURRENT_ACCESS_TIMEOUT_MS,
            ),
        }
    }
}

/// Outcome of binding a unit of work to a conversation
#[derive(Debug, Clone)]
pub struct ConversationAssociation {
    conversation: Conversation,
    signal: Option<ConversationSignal>,
}

impl ConversationAssociation {
    /// Conversation the unit of work is bound to
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Busy/missing signal when the propagated id could not be resumed
    pub fn signal(&self) -> Option<&ConversationSignal> {
        self.signal.as_ref()
    }
}

struct Association {
    conversation: Conversation,
    owner: String,
}

/// Sessions, their conversations and the per-thread conversation binding
pub struct ConversationManager {
    settings: ConversationSettings,
    contexts: Arc<ContextManager>,
    dispatcher: Arc<EventDispatcher>,
    ids: Arc<IdGenerator>,
    sessions: DashMap<String, Arc<Session>>,
    associations: DashMap<ThreadId, Association>,
}

impl ConversationManager {
    /// Manager over the conversation context of `contexts`
    pub fn new(
        settings: ConversationSettings,
        contexts: Arc<ContextManager>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            settings,
            contexts,
            dispatcher,
            ids: Arc::new(IdGenerator::default()),
            sessions: DashMap::new(),
            associations: DashMap::new(),
        }
    }

    /// Active settings
    pub fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    /// Create and register a session; a random id is used when none is given
    pub fn create_session(&self, id: Option<&str>) -> Arc<Session> {
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let session = Arc::new(Session::new(
            id.clone(),
            self.contexts.new_store(ScopeKind::Session),
        ));
        self.sessions.insert(id.clone(), session.clone());
        debug!(session = %id, "Created session");
        session
    }

    /// Registered session by id
    pub fn session(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Every live session
    pub fn sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.iter().map(|s| s.value().clone()).collect()
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Bind the calling thread's unit of work `owner` to a conversation
    ///
    /// Resumes `propagated` when it names a live conversation of `session`
    /// that can be locked in time. Otherwise a fresh transient conversation
    /// is bound and a busy or missing signal is returned with it.
    pub fn associate(
        &self,
        session: &Arc<Session>,
        owner: &str,
        propagated: Option<&str>,
    ) -> Result<ConversationAssociation> {
        let thread = thread::current().id();
        if self.associations.contains_key(&thread) {
            return Err(Error::internal(
                "a conversation is already associated with this thread",
            ));
        }
        self.evict_expired(session);

        let missing = |cid: &str| {
            warn!(cid = %cid, session = %session.id(), "Propagated conversation does not exist");
            (
                self.fresh(),
                Some(ConversationSignal::Missing {
                    cid: cid.to_string(),
                }),
            )
        };
        let (managed, signal) = match propagated.filter(|cid| !cid.is_empty()) {
            None => (self.fresh(), None),
            Some(cid) => match session.find(cid) {
                None => missing(cid),
                Some(existing) => {
                    if existing
                        .lock
                        .try_acquire(owner, self.settings.concurrent_access_timeout)
                    {
                        // the holder may have ended it while we waited
                        let live = !existing.is_transient()
                            && session
                                .find(cid)
                                .is_some_and(|current| Arc::ptr_eq(&current, &existing));
                        if live {
                            existing.touch();
                            debug!(cid = %cid, owner = %owner, "Resumed conversation");
                            (existing, None)
                        } else {
                            existing.lock.release(owner);
                            missing(cid)
                        }
                    } else {
                        warn!(cid = %cid, owner = %owner, "Conversation is busy");
                        (
                            self.fresh(),
                            Some(ConversationSignal::Busy {
                                cid: cid.to_string(),
                            }),
                        )
                    }
                }
            },
        };

        let resumed = !managed.is_transient();
        if !resumed {
            managed.lock.try_acquire(owner, Duration::ZERO);
        }
        self.contexts
            .conversation()
            .bind(managed.store().clone());
        let conversation = Conversation::new(managed, session.clone(), self.ids.clone());
        self.associations.insert(
            thread,
            Association {
                conversation: conversation.clone(),
                owner: owner.to_string(),
            },
        );
        if !resumed {
            notify_scope(
                &self.dispatcher,
                Qualifier::initialized(&ScopeKind::Conversation),
                &ScopeKind::Conversation,
                None,
            );
        }
        Ok(ConversationAssociation {
            conversation,
            signal,
        })
    }

    fn fresh(&self) -> Arc<ManagedConversation> {
        Arc::new(ManagedConversation::new(
            self.contexts.new_store(ScopeKind::Conversation),
            self.settings.default_timeout,
        ))
    }

    /// Unbind the calling thread's conversation
    ///
    /// A transient conversation is torn down; a long-running one is
    /// released for the next unit of work.
    pub fn dissociate(&self) -> Result<()> {
        let Some((_, association)) = self.associations.remove(&thread::current().id()) else {
            return Err(Error::context_not_active(ScopeKind::Conversation));
        };
        let managed = association.conversation.managed().clone();
        if managed.is_transient() {
            let cid = managed.cid();
            notify_scope(
                &self.dispatcher,
                Qualifier::before_destroyed(&ScopeKind::Conversation),
                &ScopeKind::Conversation,
                cid.as_deref(),
            );
            self.contexts.conversation().unbind();
            managed.store().destroy_all();
            notify_scope(
                &self.dispatcher,
                Qualifier::destroyed(&ScopeKind::Conversation),
                &ScopeKind::Conversation,
                cid.as_deref(),
            );
        } else {
            self.contexts.conversation().unbind();
            managed.touch();
        }
        managed.lock.release(&association.owner);
        Ok(())
    }

    /// Conversation bound to the calling thread
    pub fn current(&self) -> Result<Conversation> {
        self.associations
            .get(&thread::current().id())
            .map(|a| a.conversation.clone())
            .ok_or_else(|| Error::context_not_active(ScopeKind::Conversation))
    }

    /// Promote the current conversation to long-running
    pub fn begin(&self, cid: Option<&str>) -> Result<()> {
        self.current()?.begin(cid)
    }

    /// Demote the current conversation to transient
    pub fn end(&self) -> Result<()> {
        self.current()?.end()
    }

    /// Whether the calling thread is bound to a conversation
    pub fn is_associated(&self) -> bool {
        self.contexts.conversation().is_active()
            && self.associations.contains_key(&thread::current().id())
    }

    /// Evict idle long-running conversations of `session`
    pub fn evict_expired(&self, session: &Session) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        for conversation in session.long_running() {
            if !conversation.lock.try_acquire(EVICTION_OWNER, Duration::ZERO) {
                continue;
            }
            let cid = conversation.cid();
            let expired = conversation.is_expired(now)
                && cid
                    .as_deref()
                    .is_some_and(|cid| session.remove_if_same(cid, &conversation));
            if expired {
                // the reaper keeps the lock: a late resume attempt sees it busy
                self.tear_down(&conversation, cid.as_deref());
                info!(cid = ?cid, session = %session.id(), "Evicted idle conversation");
                evicted += 1;
            } else {
                conversation.lock.release(EVICTION_OWNER);
            }
        }
        evicted
    }

    /// Evict idle conversations of every session
    pub fn evict_all_expired(&self) -> usize {
        self.sessions().iter().map(|s| self.evict_expired(s)).sum()
    }

    /// End `session`: tear down its conversations and its session store
    pub fn invalidate_session(&self, session: &Session) {
        if !session.mark_invalidated() {
            return;
        }
        self.sessions.remove(session.id());
        for conversation in session.drain() {
            let cid = conversation.cid();
            self.tear_down(&conversation, cid.as_deref());
        }
        notify_scope(
            &self.dispatcher,
            Qualifier::before_destroyed(&ScopeKind::Session),
            &ScopeKind::Session,
            Some(session.id()),
        );
        session.store().destroy_all();
        notify_scope(
            &self.dispatcher,
            Qualifier::destroyed(&ScopeKind::Session),
            &ScopeKind::Session,
            Some(session.id()),
        );
        info!(session = %session.id(), "Session invalidated");
    }

    fn tear_down(&self, conversation: &ManagedConversation, cid: Option<&str>) {
        notify_scope(
            &self.dispatcher,
            Qualifier::before_destroyed(&ScopeKind::Conversation),
            &ScopeKind::Conversation,
            cid,
        );
        conversation.store().destroy_all();
        notify_scope(
            &self.dispatcher,
            Qualifier::destroyed(&ScopeKind::Conversation),
            &ScopeKind::Conversation,
            cid,
        );
    }
}

impl std::fmt::Debug for ConversationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager")
            .field("settings", &self.settings)
            .field("sessions", &self.sessions.len())
            .field("associations", &self.associations.len())
            .finish()
    }
}
