//! A single conversation and its handle

use super::session::Session;
use crate::contexts::ContextStore;
use crate::utils::lock;
use beanwire_domain::error::{Error, Result};
use beanwire_domain::value_objects::ConversationState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Generates conversation ids, skipping ids in use
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub(crate) fn next(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

#[derive(Debug)]
struct ConversationData {
    cid: Option<String>,
    state: ConversationState,
    timeout: Duration,
    last_used: Instant,
}

/// Exclusive binding of a conversation to one unit of work
#[derive(Debug, Default)]
pub(crate) struct ConversationLock {
    owner: Mutex<Option<String>>,
    released: Condvar,
}

impl ConversationLock {
    /// Acquire for `owner`, waiting up to `timeout`; re-entrant per owner
    pub(crate) fn try_acquire(&self, owner: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut current = lock(&self.owner);
        loop {
            match current.as_deref() {
                None => {
                    *current = Some(owner.to_string());
                    return true;
                }
                Some(holder) if holder == owner => return true,
                Some(_) => {}
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            current = self
                .released
                .wait_timeout(current, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    /// Release if held by `owner`
    pub(crate) fn release(&self, owner: &str) {
        let mut current = lock(&self.owner);
        if current.as_deref() == Some(owner) {
            *current = None;
            self.released.notify_all();
        }
    }
}

/// State shared by every handle on one conversation
#[derive(Debug)]
pub(crate) struct ManagedConversation {
    data: Mutex<ConversationData>,
    store: Arc<ContextStore>,
    pub(crate) lock: ConversationLock,
}

impl ManagedConversation {
    pub(crate) fn new(store: Arc<ContextStore>, timeout: Duration) -> Self {
        Self {
            data: Mutex::new(ConversationData {
                cid: None,
                state: ConversationState::Transient,
                timeout,
                last_used: Instant::now(),
            }),
            store,
            lock: ConversationLock::default(),
        }
    }

    pub(crate) fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    pub(crate) fn cid(&self) -> Option<String> {
        lock(&self.data).cid.clone()
    }

    pub(crate) fn is_transient(&self) -> bool {
        lock(&self.data).state == ConversationState::Transient
    }

    pub(crate) fn touch(&self) {
        lock(&self.data).last_used = Instant::now();
    }

    /// Long-running and idle for longer than its timeout
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        let data = lock(&self.data);
        data.state == ConversationState::LongRunning
            && now.saturating_duration_since(data.last_used) > data.timeout
    }
}

/// Handle on a conversation, as seen by application code
#[derive(Clone)]
pub struct Conversation {
    inner: Arc<ManagedConversation>,
    session: Arc<Session>,
    ids: Arc<IdGenerator>,
}

impl Conversation {
    pub(crate) fn new(
        inner: Arc<ManagedConversation>,
        session: Arc<Session>,
        ids: Arc<IdGenerator>,
    ) -> Self {
        Self { inner, session, ids }
    }

    pub(crate) fn managed(&self) -> &Arc<ManagedConversation> {
        &self.inner
    }

    /// Identifier; present only while long-running (or until the end of
    /// the unit of work that ended it)
    pub fn id(&self) -> Option<String> {
        self.inner.cid()
    }

    /// Current state
    pub fn state(&self) -> ConversationState {
        lock(&self.inner.data).state
    }

    /// True while not long-running
    pub fn is_transient(&self) -> bool {
        self.inner.is_transient()
    }

    /// Idle time after which a long-running conversation may be evicted
    pub fn timeout(&self) -> Duration {
        lock(&self.inner.data).timeout
    }

    /// Change the idle timeout
    pub fn set_timeout(&self, timeout: Duration) {
        lock(&self.inner.data).timeout = timeout;
    }

    /// Owning session
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Promote to long-running, with `cid` or a generated id
    ///
    /// Fails without changing anything when already long-running or when
    /// `cid` is taken by another long-running conversation of the session.
    pub fn begin(&self, cid: Option<&str>) -> Result<()> {
        let mut data = lock(&self.inner.data);
        if data.state == ConversationState::LongRunning {
            return Err(Error::ConversationAlreadyLongRunning {
                cid: data.cid.clone().unwrap_or_default(),
            });
        }
        let mut conversations = self.session.conversations_mut();
        let cid = match cid {
            Some(requested) if conversations.contains_key(requested) => {
                return Err(Error::ConversationIdInUse {
                    cid: requested.to_string(),
                });
            }
            Some(requested) => requested.to_string(),
            None => loop {
                let candidate = self.ids.next();
                if !conversations.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        conversations.insert(cid.clone(), self.inner.clone());
        data.cid = Some(cid.clone());
        data.state = ConversationState::LongRunning;
        data.last_used = Instant::now();
        tracing::info!(cid = %cid, session = %self.session.id(), "Conversation promoted to long-running");
        Ok(())
    }

    /// Demote to transient; it is torn down at the end of the unit of work
    pub fn end(&self) -> Result<()> {
        let mut data = lock(&self.inner.data);
        if data.state == ConversationState::Transient {
            return Err(Error::ConversationNotLongRunning);
        }
        data.state = ConversationState::Transient;
        if let Some(cid) = &data.cid {
            self.session.conversations_mut().remove(cid);
            tracing::info!(cid = %cid, session = %self.session.id(), "Conversation ended");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("cid", &self.id())
            .field("state", &self.state())
            .field("session", &self.session.id())
            .finish()
    }
}
