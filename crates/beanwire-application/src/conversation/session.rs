//! Sessions
//!
//! A session owns its session-scoped store and its long-running
//! conversations. It outlives the units of work that use it.

use super::handle::ManagedConversation;
use crate::contexts::ContextStore;
use crate::utils::lock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// A client session
#[derive(Debug)]
pub struct Session {
    id: String,
    store: Arc<ContextStore>,
    conversations: Mutex<HashMap<String, Arc<ManagedConversation>>>,
    initialized: AtomicBool,
    invalidated: AtomicBool,
}

impl Session {
    pub(crate) fn new(id: String, store: Arc<ContextStore>) -> Self {
        Self {
            id,
            store,
            conversations: Mutex::new(HashMap::new()),
            initialized: AtomicBool::new(false),
            invalidated: AtomicBool::new(false),
        }
    }

    /// Session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session-scoped instances
    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    /// Ids of the long-running conversations
    pub fn conversation_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.conversations).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// True once the session was invalidated
    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }

    pub(crate) fn conversations_mut(&self) -> MutexGuard<'_, HashMap<String, Arc<ManagedConversation>>> {
        lock(&self.conversations)
    }

    pub(crate) fn find(&self, cid: &str) -> Option<Arc<ManagedConversation>> {
        lock(&self.conversations).get(cid).cloned()
    }

    pub(crate) fn long_running(&self) -> Vec<Arc<ManagedConversation>> {
        lock(&self.conversations).values().cloned().collect()
    }

    /// Remove `cid` if it still maps to `conversation`
    pub(crate) fn remove_if_same(&self, cid: &str, conversation: &Arc<ManagedConversation>) -> bool {
        let mut conversations = lock(&self.conversations);
        match conversations.get(cid) {
            Some(current) if Arc::ptr_eq(current, conversation) => {
                conversations.remove(cid);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn drain(&self) -> Vec<Arc<ManagedConversation>> {
        lock(&self.conversations).drain().map(|(_, c)| c).collect()
    }

    /// True the first time it is called
    pub(crate) fn mark_initialized(&self) -> bool {
        !self.initialized.swap(true, Ordering::SeqCst)
    }

    /// True the first time it is called
    pub(crate) fn mark_invalidated(&self) -> bool {
        !self.invalidated.swap(true, Ordering::SeqCst)
    }
}
